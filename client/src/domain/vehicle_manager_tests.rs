//! Tests for the vehicle manager service.

use std::sync::Arc;

use mockall::predicate::eq;
use rstest::{fixture, rstest};
use serde_json::json;

use super::*;
use crate::domain::ports::{FixtureVehicleSource, MockVehicleSource};
use crate::domain::{ErrorCode, VehicleDetails};

fn vehicle_at(id: i64, color: &str, latitude: f64, longitude: f64) -> Vehicle {
    Vehicle::new(VehicleDetails {
        name: format!("vehicle-{id}"),
        model: "Model S".to_owned(),
        year: 2020,
        color: color.to_owned(),
        price: 40_000.into(),
        latitude,
        longitude,
    })
    .with_id(VehicleId::new(id))
}

#[fixture]
fn fleet() -> Vec<Vehicle> {
    vec![
        vehicle_at(1, "blue", 0.0, 0.0),
        vehicle_at(2, "red", 0.0, 1.0),
        vehicle_at(3, "green", 0.0, 5.0),
    ]
}

fn manager_over(vehicles: Vec<Vehicle>) -> VehicleManager<FixtureVehicleSource> {
    VehicleManager::new(Arc::new(FixtureVehicleSource::new(vehicles)))
}

#[rstest]
fn list_all_returns_collection_in_order(fleet: Vec<Vehicle>) {
    let manager = manager_over(fleet.clone());
    assert_eq!(manager.list_all().expect("list succeeds"), fleet);
}

#[rstest]
fn filter_keeps_only_matching_color(fleet: Vec<Vehicle>) {
    let manager = manager_over(fleet);

    let red = manager
        .filter([("color", json!("red"))])
        .expect("filter succeeds");

    assert_eq!(red.len(), 1);
    assert_eq!(red[0].id(), Some(VehicleId::new(2)));
}

#[test]
fn filter_rejects_multiple_pairs_without_fetching() {
    let mut source = MockVehicleSource::new();
    source.expect_fetch_all().times(0);

    let manager = VehicleManager::new(Arc::new(source));
    let error = manager
        .filter([("color", json!("red")), ("year", json!(2020))])
        .expect_err("two pairs are rejected");

    assert_eq!(error.code(), ErrorCode::Precondition);
}

#[rstest]
fn distance_between_equator_points_is_one_degree(fleet: Vec<Vehicle>) {
    let manager = manager_over(fleet);

    let distance = manager
        .get_distance(VehicleId::new(1), VehicleId::new(2))
        .expect("distance succeeds");

    assert!(
        (distance - 111_195.0).abs() < 1.0,
        "one degree of longitude on the equator, got {distance}"
    );
}

#[rstest]
fn nearest_picks_the_closest_other_vehicle(fleet: Vec<Vehicle>) {
    let manager = manager_over(fleet);

    let nearest = manager
        .get_nearest(VehicleId::new(1))
        .expect("nearest succeeds")
        .expect("a neighbour exists");

    assert_eq!(nearest.id(), Some(VehicleId::new(2)));
}

#[test]
fn nearest_skips_the_target_even_when_another_vehicle_shares_its_position() {
    let manager = manager_over(vec![
        vehicle_at(1, "blue", 10.0, 10.0),
        vehicle_at(2, "red", 10.0, 10.0),
        vehicle_at(3, "green", 10.0, 10.5),
    ]);

    let nearest = manager
        .get_nearest(VehicleId::new(1))
        .expect("nearest succeeds")
        .expect("a neighbour exists");

    assert_eq!(nearest.id(), Some(VehicleId::new(2)));
}

#[test]
fn nearest_breaks_ties_by_collection_order() {
    let manager = manager_over(vec![
        vehicle_at(1, "blue", 0.0, 0.0),
        vehicle_at(2, "red", 0.0, -1.0),
        vehicle_at(3, "green", 0.0, 1.0),
    ]);

    let nearest = manager
        .get_nearest(VehicleId::new(1))
        .expect("nearest succeeds")
        .expect("a neighbour exists");

    assert_eq!(nearest.id(), Some(VehicleId::new(2)));
}

#[test]
fn nearest_is_none_for_a_lonely_vehicle() {
    let manager = manager_over(vec![vehicle_at(1, "blue", 0.0, 0.0)]);

    let nearest = manager
        .get_nearest(VehicleId::new(1))
        .expect("nearest succeeds");

    assert!(nearest.is_none());
}

#[test]
fn nearest_fetches_target_before_collection() {
    let mut sequence = mockall::Sequence::new();
    let mut source = MockVehicleSource::new();
    source
        .expect_fetch_one()
        .with(eq(VehicleId::new(1)))
        .times(1)
        .in_sequence(&mut sequence)
        .return_once(|_| Ok(vehicle_at(1, "blue", 0.0, 0.0)));
    source
        .expect_fetch_all()
        .times(1)
        .in_sequence(&mut sequence)
        .return_once(|| Ok(vec![vehicle_at(1, "blue", 0.0, 0.0), vehicle_at(4, "red", 1.0, 1.0)]));

    let manager = VehicleManager::new(Arc::new(source));
    let nearest = manager
        .get_nearest(VehicleId::new(1))
        .expect("nearest succeeds");

    assert_eq!(nearest.and_then(|vehicle| vehicle.id()), Some(VehicleId::new(4)));
}

#[rstest]
fn distances_from_sorts_ascending(fleet: Vec<Vehicle>) {
    let manager = manager_over(fleet);

    let ranked = manager
        .distances_from(VehicleId::new(3))
        .expect("ranking succeeds");

    let ids: Vec<_> = ranked.iter().filter_map(|(vehicle, _)| vehicle.id()).collect();
    assert_eq!(ids, vec![VehicleId::new(2), VehicleId::new(1)]);
    assert!(ranked[0].1 < ranked[1].1);
}

#[test]
fn out_of_range_coordinates_still_take_part_in_the_scan() {
    let manager = manager_over(vec![
        vehicle_at(1, "blue", 0.0, 179.0),
        vehicle_at(2, "red", 120.0, 0.0),
        vehicle_at(3, "green", 0.0, 181.0),
    ]);

    let nearest = manager
        .get_nearest(VehicleId::new(1))
        .expect("scan tolerates unusual coordinates");
    let distance = manager
        .get_distance(VehicleId::new(1), VehicleId::new(3))
        .expect("distance succeeds");

    assert_eq!(nearest.and_then(|vehicle| vehicle.id()), Some(VehicleId::new(3)));
    assert!((distance - 222_389.85).abs() < 1.0, "got {distance}");
}

#[test]
fn create_returns_server_echo_with_assigned_id() {
    let manager = manager_over(vec![vehicle_at(7, "blue", 0.0, 0.0)]);
    let draft = vehicle_at(99, "red", 1.0, 1.0).without_id();

    let created = manager.create(&draft).expect("create succeeds");

    assert_eq!(created.id(), Some(VehicleId::new(8)));
    assert_eq!(created.details(), draft.details());
}

#[test]
fn create_falls_back_to_input_when_server_sends_no_echo() {
    let mut source = MockVehicleSource::new();
    source.expect_create().times(1).return_once(|_| Ok(None));

    let manager = VehicleManager::new(Arc::new(source));
    let draft = vehicle_at(1, "red", 1.0, 1.0).without_id();

    assert_eq!(manager.create(&draft).expect("create succeeds"), draft);
}

#[test]
fn create_surfaces_transport_failures() {
    let mut source = MockVehicleSource::new();
    source
        .expect_create()
        .times(1)
        .return_once(|_| Err(VehicleSourceError::transport("connection refused")));

    let manager = VehicleManager::new(Arc::new(source));
    let error = manager
        .create(&vehicle_at(1, "red", 1.0, 1.0))
        .expect_err("transport failure");

    assert_eq!(error.code(), ErrorCode::Transport);
}

#[test]
fn update_requires_an_id() {
    let mut source = MockVehicleSource::new();
    source.expect_replace().times(0);

    let manager = VehicleManager::new(Arc::new(source));
    let error = manager
        .update(&vehicle_at(1, "red", 0.0, 0.0).without_id())
        .expect_err("missing id");

    assert_eq!(error.code(), ErrorCode::Precondition);
}

#[test]
fn update_sends_details_to_the_identified_resource_and_strips_id() {
    let vehicle = vehicle_at(5, "red", 0.0, 0.0);
    let expected_details = vehicle.details().clone();

    let mut source = MockVehicleSource::new();
    source
        .expect_replace()
        .withf(move |id, details| *id == VehicleId::new(5) && *details == expected_details)
        .times(1)
        .return_once(|_, _| Ok(()));

    let manager = VehicleManager::new(Arc::new(source));
    let updated = manager.update(&vehicle).expect("update succeeds");

    assert_eq!(updated.id(), None);
    assert_eq!(updated.details(), vehicle.details());
}

#[test]
fn delete_of_unknown_id_is_a_protocol_error() {
    let manager = manager_over(vec![vehicle_at(1, "blue", 0.0, 0.0)]);

    let error = manager
        .delete(VehicleId::new(404))
        .expect_err("unknown id");

    assert_eq!(error.code(), ErrorCode::Protocol);
    assert_eq!(error.status(), Some(404));
}

#[rstest]
#[case::transport(VehicleSourceError::transport("dns"), ErrorCode::Transport)]
#[case::timeout(VehicleSourceError::timeout("30s"), ErrorCode::Transport)]
#[case::status(VehicleSourceError::status(503_u16, "unavailable"), ErrorCode::Protocol)]
#[case::decode(VehicleSourceError::decode("expected array"), ErrorCode::Decode)]
#[case::invalid(VehicleSourceError::invalid_request("bad url"), ErrorCode::Precondition)]
fn source_errors_map_to_domain_codes(#[case] source_error: VehicleSourceError, #[case] code: ErrorCode) {
    let mut source = MockVehicleSource::new();
    source
        .expect_fetch_all()
        .times(1)
        .return_once(move || Err(source_error));

    let manager = VehicleManager::new(Arc::new(source));
    let error = manager.list_all().expect_err("source failure");

    assert_eq!(error.code(), code);
}
