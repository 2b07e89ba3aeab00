use crate::review::ReviewPayload;

/// Renders a review payload as human-friendly text.
pub fn render_text(payload: &ReviewPayload) -> String {
    let mut lines = Vec::new();
    let total: usize = payload.sections.iter().map(|section| section.fields.len()).sum();
    lines.push(format!(
        "Form: {} sections, {}/{} fields visible",
        payload.sections.len(),
        payload.visible_field_count(),
        total
    ));

    for section in &payload.sections {
        lines.push(format!("{} {}", marker(section.visible), section.name));
        if !section.criteria.is_empty() {
            lines.push(format!("    criteria: {}", section.criteria));
        }
        for detail in &section.details {
            lines.push(format!("    ! {}", detail));
        }
        for field in &section.fields {
            let mut entry = format!(
                "  {} {} ({})",
                marker(field.visible),
                field.field_api_name,
                field.kind
            );
            if let Some(Some(value)) = &field.value {
                entry.push_str(&format!(" = {}", value));
            }
            lines.push(entry);
            if !field.options.is_empty() {
                let options: Vec<_> = field
                    .options
                    .iter()
                    .map(|option| option.label.as_str())
                    .collect();
                lines.push(format!("      options: {}", options.join(", ")));
            }
            for detail in &field.details {
                lines.push(format!("      ! {}", detail));
            }
        }
    }

    lines.join("\n")
}

fn marker(visible: bool) -> &'static str {
    if visible { "[+]" } else { "[-]" }
}
