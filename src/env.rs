use std::cell::RefCell;

/// Variable turning strict mode on for every command.
pub const STRICT_VAR: &str = "MANO_STRICT";
/// Variable turning per-line tracing on for `assemble`.
pub const TRACE_VAR: &str = "MANO_TRACE";

/// Defaults read from the environment. Command line flags can only turn options on.
#[derive(Clone, Copy, Default, PartialEq, Eq, Debug)]
struct Env {
    strict: bool,
    trace: bool,
}

impl Env {
    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let enabled = |name: &str| lookup(name).is_some_and(|value| is_enabled(&value));
        Env {
            strict: enabled(STRICT_VAR),
            trace: enabled(TRACE_VAR),
        }
    }
}

thread_local! {
    /// Must only be mutated within `init`
    static ENV: RefCell<Option<Env>> = const { RefCell::new(None) };
}

/// Read the environment once, before any accessor is used.
pub fn init() {
    let value = Env::from_lookup(|name| std::env::var(name).ok());
    ENV.with(|env| {
        let mut env = env.borrow_mut();
        assert!(
            env.is_none(),
            "tried to initialize environment state multiple times"
        );
        *env = Some(value);
    });
}

pub fn is_strict() -> bool {
    with_env(|env| env.strict)
}

pub fn is_trace() -> bool {
    with_env(|env| env.trace)
}

fn with_env<R>(callback: impl Fn(&Env) -> R) -> R {
    ENV.with(|env| match *env.borrow() {
        Some(env) => callback(&env),
        None => panic!("tried to access environment state before initialization"),
    })
}

/// `1`, `true`, `yes` and `on` enable an option, in any case.
fn is_enabled(value: &str) -> bool {
    matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "1" | "true" | "yes" | "on"
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn env_with(vars: &[(&str, &str)]) -> Env {
        Env::from_lookup(|name| {
            vars.iter()
                .find(|(key, _)| *key == name)
                .map(|(_, value)| value.to_string())
        })
    }

    #[test]
    fn unset_means_off() {
        assert_eq!(env_with(&[]), Env::default());
    }

    #[test]
    fn reads_both_options() {
        let env = env_with(&[(STRICT_VAR, "1"), (TRACE_VAR, "true")]);
        assert!(env.strict);
        assert!(env.trace);

        let env = env_with(&[(TRACE_VAR, " Yes ")]);
        assert!(!env.strict);
        assert!(env.trace);
    }

    #[test]
    fn other_values_are_off() {
        for value in ["0", "", "false", "off", "2"] {
            assert!(!env_with(&[(STRICT_VAR, value)]).strict, "{value:?}");
        }
    }

    #[test]
    fn accessors_after_init() {
        init();
        let expected = |name: &str| std::env::var(name).is_ok_and(|value| is_enabled(&value));
        assert_eq!(is_strict(), expected(STRICT_VAR));
        assert_eq!(is_trace(), expected(TRACE_VAR));
    }
}
