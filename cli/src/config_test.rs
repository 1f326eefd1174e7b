use super::*;

// =============================================================================
// env_parse
// =============================================================================

#[test]
fn env_parse_missing_returns_default() {
    let val: usize = env_parse("__ITINERARY_TEST_MISSING__", 42);
    assert_eq!(val, 42);
}

#[test]
fn env_parse_present_valid() {
    unsafe { std::env::set_var("__ITINERARY_TEST_VALID__", "12") };
    let val: usize = env_parse("__ITINERARY_TEST_VALID__", 0);
    assert_eq!(val, 12);
    unsafe { std::env::remove_var("__ITINERARY_TEST_VALID__") };
}

#[test]
fn env_parse_present_invalid_returns_default() {
    unsafe { std::env::set_var("__ITINERARY_TEST_INVALID__", "a week") };
    let val: usize = env_parse("__ITINERARY_TEST_INVALID__", 7);
    assert_eq!(val, 7);
    unsafe { std::env::remove_var("__ITINERARY_TEST_INVALID__") };
}

// =============================================================================
// SeedConfig
// =============================================================================

#[test]
fn seed_config_defaults_and_clamps() {
    unsafe { std::env::remove_var("ITINERARY_SEED_BOARDS") };
    assert_eq!(SeedConfig::from_env().boards, SEED_BOARD_COUNT);

    unsafe { std::env::set_var("ITINERARY_SEED_BOARDS", "100000") };
    assert_eq!(SeedConfig::from_env().boards, MAX_SEED_BOARDS);
    unsafe { std::env::remove_var("ITINERARY_SEED_BOARDS") };
}
