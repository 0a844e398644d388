//! Property-based tests using proptest
//!
//! These tests verify query string construction, registry lookup totality,
//! and endpoint templating across randomized inputs.

use proptest::prelude::*;
use url::Url;

use baremetal_provider::bmc::http::with_query;
use baremetal_provider::resource::{
    data_source_entry, data_source_type_names, resource_entry, resource_type_names,
};
use baremetal_provider::{ClientBuilder, ProviderError, RetrySchedule, Service};

mod common;

fn arb_path() -> impl Strategy<Value = String> {
    "/[a-z]{1,12}(/[a-z]{1,12}){0,2}"
}

fn arb_params() -> impl Strategy<Value = Vec<(String, String)>> {
    prop::collection::vec(("[a-zA-Z][a-zA-Z0-9_]{0,8}", "[ -~]{0,16}"), 0..5)
}

fn as_pairs(params: &[(String, String)]) -> Vec<(&str, &str)> {
    params
        .iter()
        .map(|(k, v)| (k.as_str(), v.as_str()))
        .collect()
}

proptest! {
    /// The path survives query construction unchanged
    #[test]
    fn query_preserves_path(path in arb_path(), params in arb_params()) {
        let built = with_query(&path, &as_pairs(&params));
        prop_assert!(built.starts_with(&path));
    }

    /// There is a question mark exactly when there are parameters
    #[test]
    fn query_separator_count(path in arb_path(), params in arb_params()) {
        let built = with_query(&path, &as_pairs(&params));
        let separators = built.matches('?').count();
        if params.is_empty() {
            prop_assert_eq!(separators, 0);
        } else {
            prop_assert_eq!(separators, 1);
        }
    }

    /// Whatever was encoded decodes back to the original pairs, in order
    #[test]
    fn query_encoding_round_trips(path in arb_path(), params in arb_params()) {
        let built = with_query(&path, &as_pairs(&params));
        let url = Url::parse(&format!("http://host.invalid{}", built))
            .expect("built query must stay a valid URL");

        let decoded: Vec<(String, String)> = url
            .query_pairs()
            .map(|(k, v)| (k.into_owned(), v.into_owned()))
            .collect();
        prop_assert_eq!(decoded, params);
    }

    /// Appending to a path that already carries a query uses `&`
    #[test]
    fn query_appends_to_existing(params in arb_params()) {
        let base = "/volumes?compartmentId=ocid1.compartment.oc1..aa";
        let built = with_query(base, &as_pairs(&params));
        prop_assert!(built.starts_with(base));
        if !params.is_empty() {
            prop_assert!(built[base.len()..].starts_with('&'));
        }
    }
}

/// Tests for registry lookup totality
mod registry_property_tests {
    use super::*;

    proptest! {
        /// Names outside the tables always produce the unknown-type error
        #[test]
        fn unknown_names_are_rejected(suffix in "[a-z_]{1,24}") {
            let name = format!("baremetal_zz_{}", suffix);
            prop_assert!(
                matches!(
                    resource_entry(&name),
                    Err(ProviderError::UnknownType { .. })
                ),
                "resource_entry({:?}) should be Err(UnknownType)",
                name
            );
            prop_assert!(
                matches!(
                    data_source_entry(&name),
                    Err(ProviderError::UnknownType { .. })
                ),
                "data_source_entry({:?}) should be Err(UnknownType)",
                name
            );
        }

        /// Every registered resource resolves to a stable full-lifecycle entry
        #[test]
        fn resource_lookup_is_stable(name in proptest::sample::select(resource_type_names())) {
            let first = resource_entry(name).expect("registered name must resolve");
            let second = resource_entry(name).expect("registered name must resolve");
            prop_assert!(std::ptr::eq(first, second));
            prop_assert_eq!(first.type_name, name);
            prop_assert!(first.capabilities.create);
            prop_assert!(first.capabilities.delete);
        }

        /// Every registered data source resolves to a read-only entry
        #[test]
        fn data_source_lookup_is_read_only(
            name in proptest::sample::select(data_source_type_names())
        ) {
            let entry = data_source_entry(name).expect("registered name must resolve");
            prop_assert!(entry.capabilities.read);
            prop_assert!(!entry.capabilities.create);
            prop_assert!(!entry.capabilities.update);
            prop_assert!(!entry.capabilities.delete);
        }
    }
}

/// Tests for the retry schedule shape
mod schedule_property_tests {
    use super::*;

    proptest! {
        /// Overriding the attempt budget never disturbs the delay curve
        #[test]
        fn attempt_budget_override(attempts in 1u32..60) {
            let schedule = RetrySchedule::with_max_attempts(attempts);
            let defaults = RetrySchedule::default();
            prop_assert_eq!(schedule.max_attempts, attempts);
            prop_assert_eq!(schedule.initial_delay, defaults.initial_delay);
            prop_assert_eq!(schedule.max_delay, defaults.max_delay);
            prop_assert_eq!(schedule.backoff_multiplier, defaults.backoff_multiplier);
        }
    }
}

/// Tests for endpoint templating
mod endpoint_property_tests {
    use super::*;

    proptest! {
        /// A placeholder-free template pins every service to that exact host
        #[test]
        fn literal_template_pins_all_services(
            host in "[a-z]{1,10}",
            port in 1024u16..9999,
        ) {
            let template = format!("http://{}.invalid:{}", host, port);
            let client = ClientBuilder::new()
                .credentials(common::test_bundle())
                .region("test-region")
                .url_template(&template)
                .build()
                .expect("client should build");
            for service in Service::ALL {
                prop_assert_eq!(
                    client.endpoint(service).as_str(),
                    format!("{}/", template)
                );
            }
        }

        /// The {service} placeholder routes each service to its own host
        #[test]
        fn service_placeholder_splits_hosts(host in "[a-z]{1,10}") {
            let template = format!("https://{{service}}.{}.invalid", host);
            let client = ClientBuilder::new()
                .credentials(common::test_bundle())
                .region("test-region")
                .url_template(&template)
                .build()
                .expect("client should build");
            let expectations = [
                (Service::Core, format!("iaas.{}.invalid", host)),
                (Service::Database, format!("database.{}.invalid", host)),
                (Service::ObjectStorage, format!("objectstorage.{}.invalid", host)),
            ];
            for (service, expected_host) in &expectations {
                prop_assert_eq!(
                    client.endpoint(*service).host_str(),
                    Some(expected_host.as_str())
                );
            }
        }
    }
}
