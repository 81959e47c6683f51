use crate::document::model::DefNode;

/// Definition tags copied from the template, in output order.
pub const TEMPLATE_DEF_TAGS: [&str; 3] = ["filter", "radialGradient", "linearGradient"];

/// Copy the template definitions whose tag is listed in `tags`, grouped by tag in the order
/// of `tags` and in source order within a tag.
pub fn merge_defs(template: &[DefNode], tags: &[&str]) -> Vec<DefNode> {
    tags.iter()
        .flat_map(|tag| template.iter().filter(move |d| d.tag == *tag))
        .cloned()
        .collect()
}

#[cfg(test)]
#[path = "../../tests/unit/compose/defs.rs"]
mod tests;
