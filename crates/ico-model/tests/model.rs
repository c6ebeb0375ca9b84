//! Integration tests for the shared model types.

use ico_model::{
    Crosswalk, LongRecord, Membership, Period, RawCell, RawTable, TimeAxis, UnitScale,
};

#[test]
fn record_key_ignores_measure_value() {
    let period = Period::parse(TimeAxis::Calendar, "2001").unwrap();
    let a = LongRecord::new("Brazil", period.clone(), Some(1.0));
    let b = LongRecord::new("Brazil", period, None);
    assert_eq!(a.key(), b.key());
}

#[test]
fn membership_labels_match_output_contract() {
    assert_eq!(Membership::Member.to_string(), "member");
    assert_eq!(Membership::NonMember.to_string(), "non-member");
}

#[test]
fn unit_scale_factors_are_relative_to_kilograms() {
    assert_eq!(UnitScale::Bags1k.kg_per_unit(), 60_000.0);
    assert_eq!(UnitScale::Kilograms.kg_per_unit(), 1.0);
    assert!((UnitScale::Pounds.kg_per_unit() * ico_model::LB_PER_KG - 1.0).abs() < 1e-12);
}

#[test]
fn raw_table_labels_trim_and_render_numbers() {
    let table = RawTable::new(
        "sheet",
        vec![vec![RawCell::text(" Crop year "), RawCell::Number(1990.0)]],
    );
    assert_eq!(table.row_label(0).as_deref(), Some("Crop year"));
    assert_eq!(table.cell(0, 1).label().as_deref(), Some("1990"));
}

#[test]
fn crosswalk_survives_serde_round_trip() {
    let crosswalk = Crosswalk::new([("Turkey", "Türkiye")]).unwrap();
    let json = serde_json::to_string(&crosswalk).unwrap();
    let round: Crosswalk = serde_json::from_str(&json).unwrap();
    assert_eq!(round.map("Turkey"), "Türkiye");
}
