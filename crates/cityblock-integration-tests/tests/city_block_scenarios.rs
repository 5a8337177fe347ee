//! End-to-end scenarios: recipe in, exchange string out.
//!
//! These tests drive the assembler with the built-in template library and
//! check the decoded result: slot counts, station names, rescaled circuit
//! constants, pole links, and referential integrity.

use cityblock_assembler::{AssembleError, Assembler, AssemblyStats};
use cityblock_core::test_utils::*;
use cityblock_core::{Blueprint, BlueprintString, Commodity, SignalId, SignalType, codec};
use cityblock_data::{Recipe, TemplateLibrary, TransportKind};
use cityblock_logic::combinator::ARITHMETIC_COMBINATOR;
use cityblock_logic::station::TRAIN_STOP;
use cityblock_logic::StationVariant;
use cityblock_power::{PoleKind, are_linked, find_anchor};

// ============================================================================
// Shared helpers
// ============================================================================

fn library() -> TemplateLibrary {
    TemplateLibrary::builtin().unwrap()
}

fn decode(exchange: &str) -> Blueprint {
    codec::decode(exchange).unwrap().blueprint
}

fn stop_names(bp: &Blueprint) -> Vec<&str> {
    bp.entities_named(TRAIN_STOP)
        .filter_map(|e| e.station.as_deref())
        .collect()
}

/// Every second constant of an arithmetic combinator whose first operand is
/// the given signal.
fn divisors_of(bp: &Blueprint, signal: &SignalId) -> Vec<i32> {
    bp.entities_named(ARITHMETIC_COMBINATOR)
        .filter_map(|e| e.arithmetic_conditions())
        .filter(|c| c.first_signal.as_ref() == Some(signal))
        .filter_map(|c| c.second_constant)
        .collect()
}

// ============================================================================
// Test 1: one ingredient, one product
// ============================================================================

#[test]
fn iron_plate_to_gears() {
    let lib = library();
    let recipe = Recipe::new(vec![iron_plate()], vec![gear_wheel()]);
    let assembler = Assembler::new(&lib);

    let assembly = assembler.assemble_blueprint(&recipe).unwrap();
    assert_eq!(assembly.stats.slots, 2);
    assert_eq!(assembly.stats.transport_merges, 1);
    assert_eq!(assembly.stats.power_links, 2);

    let exchange = assembler.assemble(&recipe).unwrap();
    assert!(exchange.starts_with('0'));
    assert!(exchange.len() > 1);

    let bp = decode(&exchange);
    assert_eq!(bp, assembly.blueprint);
    assert_eq!(
        stop_names(&bp),
        vec!["[U] [item=iron-plate]", "[L] [item=iron-gear-wheel]"]
    );
    assert_eq!(
        divisors_of(&bp, &SignalId::new(SignalType::Item, "iron-plate")),
        vec![288]
    );
    assert_eq!(bp.entities_named("underground-belt").count(), 2);
}

// ============================================================================
// Test 2: capacity boundary
// ============================================================================

#[test]
fn six_slots_fit() {
    let lib = library();
    let recipe = Recipe::new(
        vec![iron_plate(), copper_cable(), water()],
        vec![gear_wheel(), petroleum(), iron_plate()],
    );

    let assembly = Assembler::new(&lib).assemble_blueprint(&recipe).unwrap();

    assert_eq!(
        assembly.stats,
        AssemblyStats {
            slots: 6,
            branch_merges: 6,
            station_merges: 6,
            transport_merges: 15,
            power_links: 6,
        }
    );
    assert!(assembly.blueprint.problems().is_empty());
}

#[test]
fn seven_slots_are_rejected() {
    let lib = library();
    let recipe = Recipe::new(vec![iron_plate(); 4], vec![gear_wheel(); 3]);

    let err = Assembler::new(&lib).assemble(&recipe).unwrap_err();

    assert!(matches!(
        err,
        AssembleError::CapacityExceeded {
            requested: 7,
            capacity: 6
        }
    ));
    assert_eq!(
        err.to_string(),
        "recipe needs 7 slots but the template library only has 6"
    );
}

// ============================================================================
// Test 3: round trips
// ============================================================================

#[test]
fn skeleton_round_trips() {
    let lib = library();
    let doc = BlueprintString::new(lib.skeleton().clone());
    assert_eq!(codec::decode(&codec::encode(&doc).unwrap()).unwrap(), doc);
}

#[test]
fn every_template_round_trips() {
    let lib = library();
    let mut templates: Vec<&Blueprint> = vec![lib.skeleton(), lib.branch_bottom()];
    templates.extend(lib.branches());
    templates.extend(StationVariant::ALL.map(|v| lib.station(v)));
    templates.extend(TransportKind::ALL.map(|k| lib.transport(k)));

    for template in templates {
        let doc = BlueprintString::new(template.clone());
        assert_eq!(codec::decode(&codec::encode(&doc).unwrap()).unwrap(), doc);
    }
}

#[test]
fn unknown_fields_survive_assembly() {
    let lib = library();
    let bp = decode(
        &Assembler::new(&lib)
            .assemble(&Recipe::new(vec![iron_plate()], vec![]))
            .unwrap(),
    );

    let stop = bp.entities_named(TRAIN_STOP).next().unwrap();
    assert!(stop.extra.contains_key("manual_trains_limit"));
    let behavior = stop.control_behavior.as_ref().unwrap();
    assert!(behavior.extra.contains_key("trains_limit_signal"));
    assert_eq!(bp.version, lib.skeleton().version);
}

// ============================================================================
// Test 4: mixed commodities
// ============================================================================

#[test]
fn fluids_and_large_stacks() {
    let lib = library();
    let coal = Commodity::item("coal", stack(50));
    let recipe = Recipe::new(vec![petroleum(), coal], vec![copper_cable(), water()]).named("mix");

    let bp = decode(&Assembler::new(&lib).assemble(&recipe).unwrap());

    assert_eq!(bp.label.as_deref(), Some("City block: mix"));
    assert_eq!(
        stop_names(&bp),
        vec![
            "[U] [fluid=petroleum-gas]",
            "[U] [item=coal]",
            "[L] [item=copper-cable]",
            "[L] [fluid=water]",
        ]
    );

    // Coal unloading: 6 * 48 * 50 / 100.
    assert_eq!(
        divisors_of(&bp, &SignalId::new(SignalType::Item, "coal")),
        vec![144]
    );

    // Copper cable loading: indicator 576 and train limit 8000 on signal-each.
    let each = divisors_of(&bp, &SignalId::virtual_signal("signal-each"));
    assert!(each.contains(&576));
    assert!(each.contains(&8000));

    // The fluid buffer now reads petroleum gas as a fluid signal.
    let gas = SignalId::new(SignalType::Fluid, "petroleum-gas");
    assert!(
        bp.entities_named(ARITHMETIC_COMBINATOR)
            .filter_map(|e| e.arithmetic_conditions())
            .any(|c| c.first_constant == Some(50000) && c.second_signal.as_ref() == Some(&gas))
    );

    // Slot 0 is fluid: rows 1..3 each backfill it with pipes.
    assert_eq!(bp.entities_named("pipe-to-ground").count(), 3 * 2);
    // Slot 1 (ingredient belts) twice, slot 2 (product belts) once.
    assert_eq!(bp.entities_named("underground-belt").count(), 3 * 2);
}

// ============================================================================
// Test 5: power network
// ============================================================================

#[test]
fn every_station_is_powered() {
    let lib = library();
    let recipe = Recipe::new(vec![iron_plate(), water()], vec![gear_wheel(), petroleum()]);
    let bp = Assembler::new(&lib)
        .assemble_blueprint(&recipe)
        .unwrap()
        .blueprint;
    let layout = lib.layout();

    for i in 0..recipe.slot_count() {
        let feeder = find_anchor(&bp, &layout.feeder_pole_at(i)).unwrap();
        let station = find_anchor(&bp, &layout.station_pole_at(i)).unwrap();
        assert!(are_linked(&bp, feeder, station), "slot {i}");
    }

    let trunk = find_anchor(&bp, &layout.trunk_pole).unwrap();
    let trunk_links = bp.entity(trunk).unwrap().neighbours.clone().unwrap();
    assert_eq!(bp.entity(trunk).unwrap().name, PoleKind::Big.entity_name());
    assert!(trunk_links.contains(&find_anchor(&bp, &layout.station_pole_at(0)).unwrap()));
}
