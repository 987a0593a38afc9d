//! Init command presentation: summary formatter.

use crate::commands::InitResult;

pub fn format_init_summary(result: &InitResult) -> String {
    let mut output = String::new();
    if result.created {
        output.push_str(&format!("  ✓ profile '{}' created\n", result.profile));
    } else {
        output.push_str(&format!("  ✓ profile '{}' updated\n", result.profile));
    }
    output.push_str(&format!(
        "  Configuration file: {}\n",
        result.config_path.display()
    ));
    if result.active {
        output.push_str(&format!("  Active profile: {}\n", result.profile));
    } else {
        output.push_str(&format!(
            "  Use it with --profile {} or: gcore-cli config set active-profile {}\n",
            result.profile, result.profile
        ));
    }
    output
}
