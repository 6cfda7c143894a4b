//! Target listing

use iglu_pack::BuildTarget;

/// Print every known target, marking the default selection.
pub fn run() {
    println!("Known targets (* = built by default):");
    for line in target_lines() {
        println!("{line}");
    }
}

fn target_lines() -> Vec<String> {
    BuildTarget::all()
        .iter()
        .map(|target| {
            let marker = if BuildTarget::defaults().contains(target) {
                '*'
            } else {
                ' '
            };
            format!("  {marker} {:<14} {}", target.to_string(), target.rust_target())
        })
        .collect()
}

#[cfg(test)]
mod tests {
    #![allow(non_snake_case)]

    use super::*;

    #[test]
    fn target_lines___one_line_per_target() {
        assert_eq!(target_lines().len(), BuildTarget::all().len());
    }

    #[test]
    fn target_lines___marks_defaults_only() {
        let lines = target_lines();

        let linux = lines.iter().find(|l| l.contains("linux/amd64")).unwrap();
        assert!(linux.trim_start().starts_with('*'));

        let darwin_arm = lines.iter().find(|l| l.contains("darwin/arm64")).unwrap();
        assert!(!darwin_arm.trim_start().starts_with('*'));
    }
}
