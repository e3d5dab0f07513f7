//! Behavioural tests for the Overpass retry/backoff protocol.
//!
//! These tests drive [`OverpassClient`] with [`ScriptedTransport`] and
//! [`RecordingSleeper`], so no HTTP requests are made and no time passes.

use rstest::fixture;
use rstest_bdd_macros::{given, scenario, then, when};
use std::cell::RefCell;
use std::time::Duration;
use waypost_core::{QueryRequest, RawElement};
use waypost_data::overpass::test_support::{
    RecordingSleeper, ScriptedTransport, http_error, network_error,
};
use waypost_data::overpass::{OverpassClient, QueryError, QueryTemplate};

type Client = OverpassClient<ScriptedTransport, RecordingSleeper>;
type ClientCell = RefCell<Option<Client>>;
type ResultCell = RefCell<Option<Result<Vec<RawElement>, QueryError>>>;

const STATION_BODY: &str = r#"{"elements": [
    {"type": "node", "id": 7, "lat": 23.71, "lon": 120.54,
     "tags": {"railway": "station", "name": "Central Station"}}
]}"#;

#[fixture]
fn client() -> ClientCell {
    RefCell::new(None)
}

#[fixture]
fn result() -> ResultCell {
    RefCell::new(None)
}

fn install(cell: &ClientCell, transport: ScriptedTransport) {
    *cell.borrow_mut() = Some(OverpassClient::with_parts(
        transport,
        RecordingSleeper::default(),
        QueryTemplate::standard(),
    ));
}

fn with_client<R>(cell: &ClientCell, f: impl FnOnce(&Client) -> R) -> R {
    let guard = cell.borrow();
    let client = guard.as_ref().expect("client should be configured");
    f(client)
}

// --- Given steps ---

#[given("an Overpass service returning one station")]
fn service_ok(#[from(client)] client: &ClientCell) {
    install(client, ScriptedTransport::with_body(STATION_BODY));
}

#[given("an Overpass service that always times out at the gateway")]
fn service_gateway_timeout(#[from(client)] client: &ClientCell) {
    install(client, ScriptedTransport::with_status(504));
}

#[given("an Overpass service that rejects the query")]
fn service_rejects(#[from(client)] client: &ClientCell) {
    install(client, ScriptedTransport::with_error(http_error(400)));
}

#[given("an Overpass service that drops the first connection")]
fn service_drops_first(#[from(client)] client: &ClientCell) {
    install(
        client,
        ScriptedTransport::new([Err(network_error()), Ok(STATION_BODY.to_owned())]),
    );
}

#[given("an Overpass service returning an unreadable body")]
fn service_unreadable(#[from(client)] client: &ClientCell) {
    install(client, ScriptedTransport::with_body("<html>rate limited</html>"));
}

// --- When steps ---

#[when("a nearby query is executed with three attempts and a five second backoff")]
fn execute_query(#[from(client)] client: &ClientCell, #[from(result)] result: &ResultCell) {
    let request = QueryRequest::new(23.71, 120.54, 1_000, 3, Duration::from_secs(5))
        .expect("valid request");
    let outcome = with_client(client, |c| c.execute(&request));
    *result.borrow_mut() = Some(outcome);
}

// --- Then steps ---

#[then("one raw element is returned")]
fn one_element(#[from(result)] result: &ResultCell) {
    let guard = result.borrow();
    let elements = guard
        .as_ref()
        .expect("query should have run")
        .as_ref()
        .expect("query should succeed");
    assert_eq!(elements.len(), 1);
    assert_eq!(elements[0].tags.get("name"), Some("Central Station"));
}

#[then("the query fails as a transient service error after three attempts")]
fn transient_failure(#[from(result)] result: &ResultCell) {
    let guard = result.borrow();
    let outcome = guard.as_ref().expect("query should have run");
    match outcome {
        Err(QueryError::TransientService { attempts, source }) => {
            assert_eq!(*attempts, 3);
            assert_eq!(source.status(), Some(504));
        }
        other => panic!("expected TransientService, got {other:?}"),
    }
}

#[then("the query fails as a permanent service error after one attempt")]
fn permanent_failure(#[from(result)] result: &ResultCell) {
    let guard = result.borrow();
    let outcome = guard.as_ref().expect("query should have run");
    match outcome {
        Err(QueryError::PermanentService { attempts, source }) => {
            assert_eq!(*attempts, 1);
            assert_eq!(source.status(), Some(400));
        }
        other => panic!("expected PermanentService, got {other:?}"),
    }
}

#[then("the query fails as a malformed response")]
fn malformed_failure(#[from(result)] result: &ResultCell) {
    let guard = result.borrow();
    let outcome = guard.as_ref().expect("query should have run");
    assert!(
        matches!(outcome, Err(QueryError::MalformedResponse { .. })),
        "expected MalformedResponse, got {outcome:?}"
    );
}

#[then("the service was called once")]
fn called_once(#[from(client)] client: &ClientCell) {
    with_client(client, |c| assert_eq!(c.transport().attempts(), 1));
}

#[then("the service was called twice")]
fn called_twice(#[from(client)] client: &ClientCell) {
    with_client(client, |c| assert_eq!(c.transport().attempts(), 2));
}

#[then("no backoff delay was requested")]
fn no_delay(#[from(client)] client: &ClientCell) {
    with_client(client, |c| assert!(c.sleeper().delays().is_empty()));
}

#[then("the backoff delays were five and ten seconds")]
fn delays_five_ten(#[from(client)] client: &ClientCell) {
    with_client(client, |c| {
        assert_eq!(
            c.sleeper().delays(),
            [Duration::from_secs(5), Duration::from_secs(10)]
        );
    });
}

#[then("the backoff delays were five seconds")]
fn delays_five(#[from(client)] client: &ClientCell) {
    with_client(client, |c| {
        assert_eq!(c.sleeper().delays(), [Duration::from_secs(5)]);
    });
}

// --- Scenario registrations ---

macro_rules! register_scenario {
    ($fn_name:ident, $title:literal) => {
        #[scenario(path = "tests/features/overpass_executor.feature", name = $title)]
        fn $fn_name(client: ClientCell, result: ResultCell) {
            let _ = (client, result);
        }
    };
}

register_scenario!(
    healthy_service,
    "a healthy service answers on the first attempt"
);
register_scenario!(
    gateway_timeouts_exhaust_budget,
    "persistent gateway timeouts exhaust the retry budget"
);
register_scenario!(
    other_errors_fail_fast,
    "other service errors fail without retrying"
);
register_scenario!(
    network_fault_recovers,
    "a network fault is retried and recovers"
);
register_scenario!(
    unreadable_body_is_malformed,
    "an unreadable body is reported as malformed"
);
