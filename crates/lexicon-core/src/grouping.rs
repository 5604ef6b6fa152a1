use lexicon_types::{CategoryGroup, VocabularyItem};

/// Group items by category, largest group first.
///
/// Ties keep the order in which categories were first seen, and items keep
/// their input order inside a group.
pub fn group_by_category_descending<'a, I>(items: I) -> Vec<CategoryGroup>
where
    I: IntoIterator<Item = &'a VocabularyItem>,
{
    let mut groups: Vec<CategoryGroup> = Vec::new();

    for item in items {
        let label = item.category_label();
        match groups.iter_mut().find(|group| group.category == label) {
            Some(group) => group.items.push(item.clone()),
            None => groups.push(CategoryGroup {
                category: label.to_string(),
                items: vec![item.clone()],
            }),
        }
    }

    groups.sort_by(|a, b| b.len().cmp(&a.len()));
    groups
}

/// Distinct labels in first-seen order
pub fn distinct_categories<'a, I>(items: I) -> Vec<String>
where
    I: IntoIterator<Item = &'a VocabularyItem>,
{
    let mut labels: Vec<String> = Vec::new();
    for item in items {
        if item.category.is_empty() {
            continue;
        }
        if !labels.iter().any(|label| *label == item.category) {
            labels.push(item.category.clone());
        }
    }
    labels
}

/// Append labels not yet present, keeping existing order
pub fn merge_labels(labels: &mut Vec<String>, incoming: &[String]) {
    for label in incoming {
        if !labels.contains(label) {
            labels.push(label.clone());
        }
    }
}
