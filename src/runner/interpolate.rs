//! `${name}` substitution in command strings.
//!
//! A name resolves against the task's params first, then the process
//! environment. Resolved values are expanded again, so params may refer to
//! each other. References that resolve to nothing, or back to a name that is
//! already being expanded, are kept verbatim for the shell to deal with.

use crate::error::{InterpolationError, InterpolationResult};
use regex::Regex;
use std::collections::HashMap;
use std::env;
use std::sync::OnceLock;

/// Longest chain of nested references followed
const MAX_DEPTH: usize = 32;

fn var_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"\$\{[^}]+\}").expect("static pattern is valid"))
}

/// Substitute every resolvable `${name}` in `s`
pub fn interpolate(s: &str, vars: &HashMap<String, String>) -> InterpolationResult<String> {
    expand(s, vars, &mut Vec::new())
}

fn expand(
    s: &str,
    vars: &HashMap<String, String>,
    expanding: &mut Vec<String>,
) -> InterpolationResult<String> {
    if expanding.len() > MAX_DEPTH {
        return Err(InterpolationError::RecursiveInterpolation);
    }

    let mut out = String::with_capacity(s.len());
    let mut rest = 0;

    for found in var_pattern().find_iter(s) {
        out.push_str(&s[rest..found.start()]);
        rest = found.end();

        let reference = found.as_str();
        let name = &reference[2..reference.len() - 1];

        match resolve(name, vars) {
            Some(value) if !expanding.iter().any(|n| n == name) => {
                expanding.push(name.to_string());
                let expanded = expand(&value, vars, expanding);
                expanding.pop();
                out.push_str(&expanded?);
            }
            _ => out.push_str(reference),
        }
    }

    out.push_str(&s[rest..]);
    Ok(out)
}

fn resolve(name: &str, vars: &HashMap<String, String>) -> Option<String> {
    vars.get(name).cloned().or_else(|| env::var(name).ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vars(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_param_substitution() {
        let vars = vars(&[("src", "public"), ("dest", "build")]);
        assert_eq!(
            interpolate("cp -r ${src} ${dest}/", &vars).unwrap(),
            "cp -r public build/"
        );
    }

    #[test]
    fn test_environment_fallback() {
        env::set_var("ONTASK_TEST_INTERP_VAR", "test_value");

        let result = interpolate("Value: ${ONTASK_TEST_INTERP_VAR}", &HashMap::new()).unwrap();
        assert_eq!(result, "Value: test_value");

        env::remove_var("ONTASK_TEST_INTERP_VAR");
    }

    #[test]
    fn test_params_shadow_environment() {
        env::set_var("ONTASK_TEST_SHADOW", "from-env");

        let vars = vars(&[("ONTASK_TEST_SHADOW", "from-params")]);
        assert_eq!(interpolate("${ONTASK_TEST_SHADOW}", &vars).unwrap(), "from-params");

        env::remove_var("ONTASK_TEST_SHADOW");
    }

    #[test]
    fn test_unknown_reference_kept() {
        let result = interpolate("Hello, ${ontask_undefined}!", &HashMap::new()).unwrap();
        assert_eq!(result, "Hello, ${ontask_undefined}!");
    }

    #[test]
    fn test_nested_references() {
        let vars = vars(&[("inner", "value"), ("outer", "[${inner}]")]);
        assert_eq!(interpolate("Result: ${outer}", &vars).unwrap(), "Result: [value]");
    }

    #[test]
    fn test_cycles_left_verbatim() {
        let vars = vars(&[("loop", "${loop}"), ("a", "${b}"), ("b", "${a}")]);
        assert_eq!(interpolate("${loop}", &vars).unwrap(), "${loop}");
        assert_eq!(interpolate("${a}", &vars).unwrap(), "${a}");
    }

    #[test]
    fn test_deep_chain_rejected() {
        let mut chain = HashMap::new();
        for i in 0..=MAX_DEPTH + 1 {
            chain.insert(format!("v{}", i), format!("${{v{}}}", i + 1));
        }
        assert!(matches!(
            interpolate("${v0}", &chain),
            Err(InterpolationError::RecursiveInterpolation)
        ));
    }

    #[test]
    fn test_plain_text() {
        assert_eq!(
            interpolate("No variables here, ${}", &HashMap::new()).unwrap(),
            "No variables here, ${}"
        );
    }
}
