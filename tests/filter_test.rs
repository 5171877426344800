//! Tests for VisibilityFilter parsing and matching

use rstest::rstest;

use todotree::{DomainError, VisibilityFilter};

#[rstest]
#[case("SHOW_ALL", VisibilityFilter::ShowAll)]
#[case("SHOW_ACTIVE", VisibilityFilter::ShowActive)]
#[case("SHOW_COMPLETED", VisibilityFilter::ShowCompleted)]
#[case("show_active", VisibilityFilter::ShowActive)]
#[case("all", VisibilityFilter::ShowAll)]
#[case("Active", VisibilityFilter::ShowActive)]
#[case(" completed ", VisibilityFilter::ShowCompleted)]
fn given_known_name_when_parsing_then_returns_filter(
    #[case] name: &str,
    #[case] expected: VisibilityFilter,
) {
    assert_eq!(name.parse::<VisibilityFilter>().unwrap(), expected);
}

#[rstest]
#[case("")]
#[case("SHOW_SOME")]
#[case("done")]
fn given_unknown_name_when_parsing_then_invalid_filter(#[case] name: &str) {
    assert_eq!(
        name.parse::<VisibilityFilter>().unwrap_err(),
        DomainError::InvalidFilter(name.to_string())
    );
}

#[test]
fn given_filter_when_displaying_then_round_trips_through_parse() {
    for filter in VisibilityFilter::ALL {
        assert_eq!(filter.to_string().parse::<VisibilityFilter>().unwrap(), filter);
    }
}

#[rstest]
#[case(VisibilityFilter::ShowAll, false, true)]
#[case(VisibilityFilter::ShowAll, true, true)]
#[case(VisibilityFilter::ShowActive, false, true)]
#[case(VisibilityFilter::ShowActive, true, false)]
#[case(VisibilityFilter::ShowCompleted, false, false)]
#[case(VisibilityFilter::ShowCompleted, true, true)]
fn given_completion_state_when_matching_then_follows_filter(
    #[case] filter: VisibilityFilter,
    #[case] completed: bool,
    #[case] expected: bool,
) {
    assert_eq!(filter.matches(completed), expected);
}

#[test]
fn given_default_filter_then_show_all() {
    assert_eq!(VisibilityFilter::default(), VisibilityFilter::ShowAll);
}
