/// Per-label checks for the domain: length 1..=63, no hyphen at either
/// edge of a label. Returns the first violation found.
pub(crate) fn check_domain_labels(domain: &str) -> Option<String> {
    for label in domain.split('.') {
        if label.is_empty() {
            return Some("empty domain label".to_string());
        }
        if label.len() > 63 {
            return Some(format!("domain label '{}' length {} > 63", label, label.len()));
        }
        if label.starts_with('-') || label.ends_with('-') {
            return Some(format!("domain label '{}' cannot start/end with '-'", label));
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn basic_domain_ok() {
        assert!(check_domain_labels("example.com").is_none());
        assert!(check_domain_labels("mail-1.example.co.uk").is_none());
    }

    #[test]
    fn label_too_long() {
        let long = "a".repeat(64);
        assert!(check_domain_labels(&format!("{long}.com")).is_some());
    }

    #[test]
    fn label_hyphen_edges() {
        assert!(check_domain_labels("ex.-ample.com").is_some());
        assert!(check_domain_labels("ex.ample-.com").is_some());
    }
}
