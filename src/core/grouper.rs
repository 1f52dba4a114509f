use crate::domain::model::{Contact, LabelCapacity, LabelUnit};
use std::collections::{HashMap, HashSet};

/// Stable sort by destination callsign; QSOs to one station keep their log order.
pub fn sort_by_destination(contacts: &mut [Contact]) {
    contacts.sort_by(|a, b| a.to_call.cmp(&b.to_call));
}

/// First callsign whose QSOs are split into more than one run, if any.
pub fn find_contiguity_violation(contacts: &[Contact]) -> Option<&str> {
    let mut closed: HashSet<&str> = HashSet::new();
    let mut previous: Option<&str> = None;

    for contact in contacts {
        let call = contact.to_call.as_str();
        if previous == Some(call) {
            continue;
        }
        if closed.contains(call) {
            return Some(call);
        }
        if let Some(prev) = previous {
            closed.insert(prev);
        }
        previous = Some(call);
    }

    None
}

/// Pulls every callsign's QSOs into one run. Runs are ordered by the callsign's
/// first appearance, so contiguous input comes back unchanged.
fn gather_runs(contacts: Vec<Contact>) -> Vec<Contact> {
    let mut order: Vec<String> = Vec::new();
    let mut runs: HashMap<String, Vec<Contact>> = HashMap::new();

    for contact in contacts {
        match runs.get_mut(&contact.to_call) {
            Some(run) => run.push(contact),
            None => {
                order.push(contact.to_call.clone());
                runs.insert(contact.to_call.clone(), vec![contact]);
            }
        }
    }

    order
        .iter()
        .filter_map(|call| runs.remove(call))
        .flatten()
        .collect()
}

/// Splits QSOs into labels of at most `capacity` QSOs to a single callsign.
pub fn group_contacts(contacts: Vec<Contact>, capacity: LabelCapacity) -> Vec<LabelUnit> {
    let violation = find_contiguity_violation(&contacts).map(str::to_string);
    let contacts = match violation {
        Some(call) => {
            tracing::warn!(
                "QSOs with {} are not adjacent in the input, regrouping by callsign",
                call
            );
            gather_runs(contacts)
        }
        None => contacts,
    };

    let mut labels: Vec<LabelUnit> = Vec::new();

    for contact in contacts {
        // New label on a callsign change or when the open one is full.
        let open_new = match labels.last() {
            Some(label) => {
                label.to_call != contact.to_call || label.qsos_on_label() >= capacity.get()
            }
            None => true,
        };

        if open_new {
            labels.push(LabelUnit::new(contact));
        } else if let Some(label) = labels.last_mut() {
            label.contacts.push(contact);
        }
    }

    labels
}
