//! Facility ranking and order assignment with in-process routers.

#![allow(clippy::unwrap_used, clippy::indexing_slicing)]

use std::sync::Arc;
use std::time::Duration;

use clean_food_core::{
    AssignmentMethod, Coordinate, Facility, FacilityId, Order, OrderId, VehicleProfile, Vnd,
};
use clean_food_delivery::assignment::{AssignmentOutcome, OrderAssigner};
use clean_food_delivery::fee::{ASSIGNMENT_FEE_CAP, FeeSchedule};
use clean_food_delivery::locator::{
    FacilityLocator, RankedFacility, SearchMode, UNLIMITED_DISTANCE_KM,
};
use clean_food_delivery::routing::{RoadRouter, RoutingError};
use clean_food_delivery::zones::{DeliveryZoneChecker, ReferenceArea, ZoneMatchBasis};
use clean_food_delivery::{DeliveryConfig, DeliveryEngine, DeliveryError};
use clean_food_integration_tests::{FailingRouter, FixedDistanceRouter, coordinate, facility};

fn customer() -> Coordinate {
    ReferenceArea::default().center
}

fn farms() -> Vec<Facility> {
    vec![
        facility(1, 10.95, 106.82),
        facility(2, 10.80, 106.70),
        facility(3, 11.30, 106.10),
    ]
}

fn assigner(router: Arc<dyn RoadRouter>) -> OrderAssigner {
    OrderAssigner::new(
        FacilityLocator::new(router, 4),
        DeliveryZoneChecker::reference_only(ReferenceArea::default()),
        FeeSchedule::default().with_cap(Some(ASSIGNMENT_FEE_CAP)),
        50.0,
    )
}

fn ids(ranked: &[RankedFacility]) -> Vec<i32> {
    ranked.iter().map(|r| r.facility.id.as_i32()).collect()
}

// ============================================================================
// Locator
// ============================================================================

#[tokio::test]
async fn test_road_ranking_orders_by_distance() {
    let farms = farms();
    let router = FixedDistanceRouter::for_facilities(&[
        (&farms[0], 30.0),
        (&farms[1], 5.0),
        (&farms[2], 12.0),
    ]);
    let locator = FacilityLocator::new(Arc::new(router), 8);

    let ranked = locator
        .find_nearest(
            &farms,
            customer(),
            UNLIMITED_DISTANCE_KM,
            50,
            SearchMode::Road(VehicleProfile::Car),
        )
        .await;
    assert_eq!(ids(&ranked), vec![2, 3, 1]);
    assert!((ranked[0].distance_km - 5.0).abs() < f64::EPSILON);
    assert!(ranked.iter().all(|r| r.route.is_some()));

    let ranked = locator
        .find_nearest(&farms, customer(), 10.0, 50, SearchMode::Road(VehicleProfile::Car))
        .await;
    assert_eq!(ids(&ranked), vec![2]);
}

#[tokio::test]
async fn test_road_ranking_with_no_located_facilities() {
    let router = Arc::new(FailingRouter::default());
    let locator = FacilityLocator::new(router.clone(), 8);
    let facilities = vec![Facility::unlocated(FacilityId::new(1), "Unmapped")];

    let ranked = locator
        .find_nearest(
            &facilities,
            customer(),
            UNLIMITED_DISTANCE_KM,
            5,
            SearchMode::Road(VehicleProfile::Car),
        )
        .await;

    assert!(ranked.is_empty());
    assert_eq!(router.calls(), 0);
}

#[tokio::test]
async fn test_straight_line_mode_ignores_router() {
    let router = Arc::new(FailingRouter::default());
    let locator = FacilityLocator::new(router.clone(), 8);

    let ranked = locator
        .find_nearest(&farms(), customer(), UNLIMITED_DISTANCE_KM, 2, SearchMode::StraightLine)
        .await;

    assert_eq!(ids(&ranked), vec![2, 1]);
    assert_eq!(router.calls(), 0);
}

#[tokio::test]
async fn test_equal_road_distances_keep_input_order_when_answers_arrive_late() {
    let farms = farms();
    let router = FixedDistanceRouter::for_facilities(&[
        (&farms[0], 7.0),
        (&farms[1], 7.0),
        (&farms[2], 7.0),
    ])
    .with_delay(&farms[0], Duration::from_millis(200));
    let locator = FacilityLocator::new(Arc::new(router), 8);

    let ranked = locator
        .find_nearest(
            &farms,
            customer(),
            50.0,
            10,
            SearchMode::Road(VehicleProfile::Car),
        )
        .await;

    // Farm 1 answers last but still wins the tie
    assert_eq!(ids(&ranked), vec![1, 2, 3]);
}

// ============================================================================
// Assignment
// ============================================================================

#[tokio::test]
async fn test_assigns_nearest_by_road() {
    let farms = farms();
    let router = FixedDistanceRouter::for_facilities(&[
        (&farms[0], 30.0),
        (&farms[1], 5.0),
        (&farms[2], 12.0),
    ]);
    let mut order = Order::new(OrderId::new(100), Some(customer()), Vnd::new(250_000));

    let outcome = assigner(Arc::new(router))
        .assign_order(&mut order, &farms)
        .await
        .unwrap();

    let AssignmentOutcome::Assigned {
        assignment,
        method,
        fallback_reason,
    } = &outcome
    else {
        panic!("expected an assignment, got {outcome:?}");
    };
    assert_eq!(*method, AssignmentMethod::Road);
    assert!(fallback_reason.is_none());
    assert_eq!(assignment.facility_name, "Farm 2");
    assert!(assignment.geometry.is_some());

    assert_eq!(order.assigned_facility_id(), Some(FacilityId::new(2)));
    assert_eq!(order.delivery_distance_km(), Some(5.0));
    assert_eq!(order.delivery_duration_min(), Some(15.0));
    assert_eq!(order.delivery_fee(), Vnd::new(40_000));
    assert_eq!(order.assignment_method(), AssignmentMethod::Road);
    assert_eq!(order.total(), Vnd::new(290_000));
}

#[tokio::test]
async fn test_road_fee_is_capped() {
    let farms = farms();
    let router = FixedDistanceRouter::for_facilities(&[(&farms[1], 12.0)]);
    let mut order = Order::new(OrderId::new(101), Some(customer()), Vnd::new(90_000));

    let outcome = assigner(Arc::new(router))
        .assign_order(&mut order, &farms)
        .await
        .unwrap();

    let fee = outcome.assignment().unwrap().fee;
    assert!(fee.cap_applied);
    assert_eq!(fee.total, ASSIGNMENT_FEE_CAP);
    assert_eq!(order.delivery_fee(), Vnd::new(50_000));
}

#[tokio::test]
async fn test_partial_routing_failures_still_use_road() {
    let farms = farms();
    // Farm 2 is not in the table, so routing it fails
    let router = FixedDistanceRouter::for_facilities(&[(&farms[0], 21.0), (&farms[2], 44.0)]);
    let mut order = Order::new(OrderId::new(102), Some(customer()), Vnd::new(90_000));

    let outcome = assigner(Arc::new(router))
        .assign_order(&mut order, &farms)
        .await
        .unwrap();

    assert_eq!(outcome.method(), AssignmentMethod::Road);
    assert_eq!(order.assigned_facility_id(), Some(FacilityId::new(1)));
}

#[tokio::test]
async fn test_falls_back_to_straight_line_when_routing_fails() {
    let router = Arc::new(FailingRouter::default());
    let farms = farms();
    let mut order = Order::new(OrderId::new(103), Some(customer()), Vnd::new(120_000));

    let outcome = assigner(router.clone())
        .assign_order(&mut order, &farms)
        .await
        .unwrap();

    assert_eq!(router.calls(), 3);

    let AssignmentOutcome::Assigned {
        assignment,
        method,
        fallback_reason,
    } = &outcome
    else {
        panic!("expected a fallback assignment, got {outcome:?}");
    };
    assert_eq!(*method, AssignmentMethod::StraightLineFallback);
    assert_eq!(
        fallback_reason,
        &Some(DeliveryError::Routing(RoutingError::Timeout(5000)))
    );
    assert!(assignment.geometry.is_none());

    // Farm 2 is ~6 km away in a straight line
    assert_eq!(order.assigned_facility_id(), Some(FacilityId::new(2)));
    let distance = order.delivery_distance_km().unwrap();
    assert!((distance - 6.02).abs() < 1e-9);
    assert!((order.delivery_duration_min().unwrap() - distance * 2.0).abs() < 1e-9);

    let schedule = FeeSchedule::default().with_cap(Some(ASSIGNMENT_FEE_CAP));
    assert_eq!(assignment.fee, schedule.compute(distance));
    assert!(order.delivery_fee() > Vnd::new(45_000) && order.delivery_fee() <= Vnd::new(45_100));
    assert_eq!(order.assignment_method(), AssignmentMethod::StraightLineFallback);
}

#[tokio::test]
async fn test_fallback_has_no_distance_ceiling() {
    let router = Arc::new(FailingRouter::default());
    // ~480 km away
    let farms = vec![facility(7, 15.0, 107.5)];
    let mut order = Order::new(OrderId::new(104), Some(customer()), Vnd::new(80_000));

    let outcome = assigner(router)
        .assign_order(&mut order, &farms)
        .await
        .unwrap();

    assert_eq!(outcome.method(), AssignmentMethod::StraightLineFallback);
    assert_eq!(order.assigned_facility_id(), Some(FacilityId::new(7)));
    assert_eq!(order.delivery_fee(), ASSIGNMENT_FEE_CAP);
}

#[tokio::test]
async fn test_everything_beyond_ceiling_leaves_unassigned() {
    let farms = farms();
    let router = FixedDistanceRouter::for_facilities(&[
        (&farms[0], 60.0),
        (&farms[1], 75.0),
        (&farms[2], 120.0),
    ]);
    let mut order = Order::new(OrderId::new(105), Some(customer()), Vnd::new(80_000));

    let outcome = assigner(Arc::new(router))
        .assign_order(&mut order, &farms)
        .await
        .unwrap();

    let AssignmentOutcome::Unassigned { reason, zone } = &outcome else {
        panic!("expected no assignment, got {outcome:?}");
    };
    assert_eq!(reason, &DeliveryError::NoFacilityAvailable);
    assert_eq!(zone.basis, ZoneMatchBasis::ReferenceRadius);
    assert!(!order.is_assigned());
    assert_eq!(order.delivery_fee(), Vnd::new(30_000));
    assert_eq!(order.assignment_method(), AssignmentMethod::Unassigned);
}

#[tokio::test]
async fn test_no_located_facilities_uses_zone_default() {
    let router = Arc::new(FailingRouter::default());
    let facilities = vec![
        Facility::unlocated(FacilityId::new(1), "Unmapped A"),
        Facility::unlocated(FacilityId::new(2), "Unmapped B"),
    ];
    let mut order = Order::new(OrderId::new(106), Some(customer()), Vnd::new(80_000));

    let outcome = assigner(router.clone())
        .assign_order(&mut order, &facilities)
        .await
        .unwrap();

    assert_eq!(outcome.method(), AssignmentMethod::Unassigned);
    assert_eq!(router.calls(), 0);
    assert!(!order.is_assigned());
    assert_eq!(order.delivery_fee(), Vnd::new(30_000));
}

#[tokio::test]
async fn test_no_located_facilities_outside_service_area() {
    let router = Arc::new(FailingRouter::default());
    let facilities = vec![Facility::unlocated(FacilityId::new(1), "Unmapped")];
    // Hanoi
    let mut order = Order::new(OrderId::new(107), Some(coordinate(21.03, 105.85)), Vnd::ZERO);

    let outcome = assigner(router)
        .assign_order(&mut order, &facilities)
        .await
        .unwrap();

    let AssignmentOutcome::Unassigned { zone, .. } = &outcome else {
        panic!("expected no assignment, got {outcome:?}");
    };
    assert!(!zone.can_deliver);
    assert_eq!(zone.eta_description, "Delivery is not available in this area");
    assert_eq!(order.delivery_fee(), Vnd::ZERO);
}

#[tokio::test]
async fn test_order_without_coordinate() {
    let router = Arc::new(FailingRouter::default());
    let mut order = Order::new(OrderId::new(108), None, Vnd::new(80_000));

    let outcome = assigner(router.clone())
        .assign_order(&mut order, &farms())
        .await
        .unwrap();

    assert!(matches!(
        outcome,
        AssignmentOutcome::Unassigned {
            reason: DeliveryError::MissingDeliveryCoordinate,
            ..
        }
    ));
    assert_eq!(router.calls(), 0);
    assert_eq!(order.delivery_fee(), Vnd::ZERO);
    assert_eq!(order.total(), Vnd::new(80_000));
}

#[tokio::test]
async fn test_assigned_order_is_not_reassigned() {
    let farms = farms();
    let first = FixedDistanceRouter::for_facilities(&[(&farms[1], 5.0), (&farms[2], 12.0)]);
    let mut order = Order::new(OrderId::new(109), Some(customer()), Vnd::new(80_000));
    assigner(Arc::new(first))
        .assign_order(&mut order, &farms)
        .await
        .unwrap();
    let before = order.clone();

    // Farm 2 is now unreachable; the order keeps its facility
    let second = FixedDistanceRouter::for_facilities(&[(&farms[2], 12.0)]);
    let second = assigner(Arc::new(second));
    assert!(second.assign_order(&mut order, &farms).await.is_none());
    assert_eq!(order, before);

    // An explicit reassignment re-runs the workflow
    let outcome = second.reassign_order(&mut order, &farms).await;
    assert_eq!(outcome.method(), AssignmentMethod::Road);
    assert_eq!(order.assigned_facility_id(), Some(FacilityId::new(3)));
    assert_eq!(order.delivery_distance_km(), Some(12.0));
}

// ============================================================================
// Engine
// ============================================================================

#[tokio::test]
async fn test_engine_quote_route_is_uncapped() {
    let farms = farms();
    let router = FixedDistanceRouter::for_facilities(&[(&farms[0], 12.0)]);
    let engine = DeliveryEngine::with_router(
        DeliveryConfig::default(),
        Arc::new(router),
        DeliveryZoneChecker::reference_only(ReferenceArea::default()),
    );

    let quote = engine
        .quote_route(&farms[0], customer(), VehicleProfile::Motorbike)
        .await
        .unwrap();

    assert!((quote.route.distance_km - 12.0).abs() < f64::EPSILON);
    assert_eq!(quote.fee.total, Vnd::new(75_000));
    assert!(!quote.fee.cap_applied);
}

#[tokio::test]
async fn test_engine_quote_route_errors() {
    let engine = DeliveryEngine::with_router(
        DeliveryConfig::default(),
        Arc::new(FailingRouter::default()),
        DeliveryZoneChecker::reference_only(ReferenceArea::default()),
    );

    let unlocated = Facility::unlocated(FacilityId::new(1), "Unmapped");
    let err = engine
        .quote_route(&unlocated, customer(), VehicleProfile::Car)
        .await
        .unwrap_err();
    assert_eq!(err, DeliveryError::NoFacilityAvailable);

    let err = engine
        .quote_route(&farms()[0], customer(), VehicleProfile::Car)
        .await
        .unwrap_err();
    assert!(matches!(err, DeliveryError::Routing(RoutingError::Timeout(_))));
}

#[tokio::test]
async fn test_engine_assigns_with_configured_ceiling() {
    let farms = farms();
    let router = FixedDistanceRouter::for_facilities(&[(&farms[0], 45.0), (&farms[1], 55.0)]);
    let engine = DeliveryEngine::with_router(
        DeliveryConfig::default(),
        Arc::new(router),
        DeliveryZoneChecker::reference_only(ReferenceArea::default()),
    );
    let mut order = Order::new(OrderId::new(110), Some(customer()), Vnd::new(80_000));

    let outcome = engine.assign_order(&mut order, &farms).await.unwrap();

    assert_eq!(outcome.method(), AssignmentMethod::Road);
    assert_eq!(order.assigned_facility_id(), Some(FacilityId::new(1)));
    assert_eq!(order.delivery_fee(), ASSIGNMENT_FEE_CAP);
}
