//! `.gitignore` templates compiled into the binary.
//!
//! Used when no resources directory is configured, or when it lacks the
//! requested template.

const GITIGNORE_VANILLA: &str = include_str!("../../resources/gitignore-vanilla");
const GITIGNORE_COMPOSER: &str = include_str!("../../resources/gitignore-composer");

/// Built-in contents for a template name such as `gitignore-vanilla`.
pub fn builtin_gitignore(template: &str) -> Option<&'static str> {
    match template {
        "gitignore-vanilla" => Some(GITIGNORE_VANILLA),
        "gitignore-composer" => Some(GITIGNORE_COMPOSER),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ToolstackKind;

    #[test]
    fn every_toolstack_has_a_builtin_template() {
        for kind in ToolstackKind::ALL {
            let template = builtin_gitignore(kind.gitignore_template());
            assert!(template.is_some_and(|t| t.contains("/.platform/local/")), "{kind}");
        }
    }

    #[test]
    fn composer_template_ignores_vendor() {
        assert!(builtin_gitignore("gitignore-composer").is_some_and(|t| t.contains("/vendor/")));
        assert_eq!(builtin_gitignore("gitignore-drupal"), None);
    }
}
