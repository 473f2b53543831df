//! Runtime validator registration and removal

use pretty_assertions::assert_eq;
use switchyard::*;

fn is_even(value: &str, _: &Constraint) -> bool {
    value.parse::<i64>().is_ok_and(|n| n % 2 == 0)
}

fn divisible_by(value: &str, constraint: &Constraint) -> bool {
    match (value.parse::<i64>(), constraint.argument().map(str::parse::<i64>)) {
        (Ok(n), Some(Ok(divisor))) if divisor != 0 => n % divisor == 0,
        _ => false,
    }
}

#[test]
fn test_custom_validator() {
    let mut router = Router::new();
    router.add_validator("even", 100, is_even);
    router.add("/numbers/{n:even}", "even").unwrap();

    assert_eq!(router.match_path("/numbers/4").param("n"), Some("4"));
    assert!(!router.match_path("/numbers/5").is_match());
}

#[test]
fn test_custom_validator_with_argument() {
    let mut router = Router::new();
    router.add_validator("divisibleBy", 100, divisible_by);
    router.add("/multiples/{n:int:divisibleBy(3)}", "multiples").unwrap();

    assert!(router.match_path("/multiples/9").is_match());
    assert!(!router.match_path("/multiples/10").is_match());
    assert!(!router.match_path("/multiples/nine").is_match());
}

#[test]
fn test_custom_validator_combined_with_builtins() {
    let mut router = Router::new();
    router.add_validator("username", 50, |value, _| {
        value.chars().all(|c| c.is_ascii_alphanumeric() || c == '_')
    });
    router
        .add("/profile/{name:minlength(3):maxlength(16):username}", "profile")
        .unwrap();

    assert_eq!(router.match_path("/profile/john_doe").param("name"), Some("john_doe"));
    assert!(!router.match_path("/profile/jo").is_match());
    assert!(!router.match_path("/profile/john-doe").is_match());
}

#[test]
fn test_validator_names_are_case_insensitive() {
    let mut router = Router::new();
    router.add_validator("Even", 100, is_even);
    assert!(router.has_validator("even"));
    assert!(router.has_validator("EVEN"));

    router.add("/n/{n:EVEN}", ()).unwrap();
    assert!(router.match_path("/n/2").is_match());
}

#[test]
fn test_remove_validator() {
    let mut router: Router<()> = Router::new();
    router.add_validator("temp", 100, |_, _| true);
    assert!(router.has_validator("temp"));

    assert!(router.remove_validator("temp"));
    assert!(!router.has_validator("temp"));
    assert!(!router.remove_validator("temp"));

    assert!(matches!(
        router.add("/t/{x:temp}", ()),
        Err(RouteError::UnknownConstraint { .. })
    ));
}

#[test]
fn test_overwriting_builtin() {
    let mut router = Router::new();
    router.add_validator("int", 10, |value, _| value == "forty-two");
    router.add("/answer/{n:int}", ()).unwrap();

    assert!(router.match_path("/answer/forty-two").is_match());
    assert!(!router.match_path("/answer/42").is_match());
}

#[test]
fn test_routers_do_not_share_validators() {
    let mut first: Router<()> = Router::new();
    first.add_validator("even", 100, is_even);

    let second: Router<()> = Router::new();
    assert!(first.has_validator("even"));
    assert!(!second.has_validator("even"));
}

#[test]
fn test_router_with_custom_registry() {
    let validators = ValidatorRegistry::empty().with("hex", 20, |value, _| {
        !value.is_empty() && value.chars().all(|c| c.is_ascii_hexdigit())
    });
    let mut router = Router::with_validators(validators);

    router.add("/color/{code:hex}", "color").unwrap();
    assert!(router.add("/n/{n:int}", "int").is_err());
    assert!(router.match_path("/color/ff00aa").is_match());
    assert_eq!(router.validators().names(), vec!["hex"]);
}
