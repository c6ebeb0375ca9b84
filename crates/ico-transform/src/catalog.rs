//! Static knowledge about the published source sheets.
//!
//! Row positions are absolute, 0-based sheet rows. Every volume sheet puts
//! its period labels on row 3 and its first entity on row 4.

use ico_model::{AggregateEntity, Crosswalk, Measure, Membership, SourceKind};

use crate::columns::measures;
use crate::error::Result;
use crate::layout::{OutputSchema, TableLayout};
use crate::split::SplitRule;
use crate::tagging::{TagMatcher, TagRule, TagTransform};
use crate::window::DataWindow;

const HEADER_ROW: usize = 3;
const FIRST_ROW: usize = 4;
/// The non-member sheets end before their footnotes at a fixed row.
const NON_MEMBER_END: usize = 130;

pub const TOTAL: &str = "Total";
pub const HARVEST_GROUPS: [&str; 3] = ["April group", "July group", "October group"];
pub const NON_MEMBER_REGIONS: [&str; 7] = [
    "Africa",
    "Asia & Oceania",
    "Caribbean",
    "Central America & Mexico",
    "Europe",
    "North America",
    "South America",
];
pub const COFFEE_TYPES: [&str; 4] = [
    "Colombian Milds",
    "Other Milds",
    "Brazilian Naturals",
    "Robustas",
];

const MEMBER_EXCLUDED: [&str; 1] = ["European Union"];
const NON_MEMBER_EXCLUDED: [&str; 1] = ["China, People's Republic of"];

const MEMBER_REGIONS: [(&str, &str); 35] = [
    ("Austria", "Europe"),
    ("Belgium", "Europe"),
    ("Belgium/Luxembourg", "Europe"),
    ("Bulgaria", "Europe"),
    ("Croatia", "Europe"),
    ("Cyprus", "Europe"),
    ("Czechia", "Europe"),
    ("Denmark", "Europe"),
    ("Estonia", "Europe"),
    ("Finland", "Europe"),
    ("France", "Europe"),
    ("Germany", "Europe"),
    ("Greece", "Europe"),
    ("Hungary", "Europe"),
    ("Ireland", "Europe"),
    ("Italy", "Europe"),
    ("Latvia", "Europe"),
    ("Lithuania", "Europe"),
    ("Luxembourg", "Europe"),
    ("Malta", "Europe"),
    ("Netherlands", "Europe"),
    ("Poland", "Europe"),
    ("Portugal", "Europe"),
    ("Romania", "Europe"),
    ("Slovakia", "Europe"),
    ("Slovenia", "Europe"),
    ("Spain", "Europe"),
    ("Sweden", "Europe"),
    ("Japan", "Asia & Oceania"),
    ("Norway", "Europe"),
    ("Russian Federation", "Europe"),
    ("Switzerland", "Europe"),
    ("Tunisia", "Africa"),
    ("United Kingdom", "Europe"),
    ("United States of America", "North America"),
];

const PRODUCER_NAMES: [(&str, &str); 4] = [
    ("Democratic Republic of Congo", "Democratic Republic of the Congo"),
    ("Tanzania", "United Republic of Tanzania"),
    ("Trinidad & Tobago", "Trinidad and Tobago"),
    ("Venezuela", "Venezuela (Bolivarian Republic of)"),
];

const TRADE_NAMES: [(&str, &str); 13] = [
    ("Abu Dhabi", "United Arab Emirates"),
    ("China (Mainland)", "China"),
    ("Democratic People's Republic of Korea", "Dem. People's Republic of Korea"),
    ("Dubai", "United Arab Emirates"),
    ("Hong Kong", "China, Hong Kong SAR"),
    ("Macao", "China, Macao SAR"),
    ("Micronesia (Federated States of)", "Micronesia"),
    ("Netherlands Antilles (former)", "Netherlands Antilles (former)"),
    ("Saint Vincent & the Grenadines", "Saint Vincent and the Grenadines"),
    ("Taiwan", "China, Taiwan Province of China"),
    ("Turkey", "Türkiye"),
    ("USSR", "Russian Federation"),
    ("Yugoslavia SFR", "Yugoslavia SFR"),
];

/// Normalization layout of a source, or `None` for the indicator sheet,
/// which is pivoted rather than unpivoted.
pub fn source_layout(kind: SourceKind) -> Option<TableLayout> {
    let producer = |schema, name: &str| {
        TableLayout::new(
            schema,
            Measure::volume(name),
            DataWindow::sentinel(HEADER_ROW, FIRST_ROW, &[TOTAL]),
        )
        .with_group(harvest_group_rule())
    };
    let member = |name: &str| {
        TableLayout::new(
            OutputSchema::Importer,
            Measure::volume(name),
            DataWindow::sentinel(HEADER_ROW, FIRST_ROW, &[TOTAL]),
        )
        .with_membership(Membership::Member)
        .excluding(&MEMBER_EXCLUDED)
    };
    let non_member = |name: &str| {
        TableLayout::new(
            OutputSchema::Importer,
            Measure::volume(name),
            DataWindow::fixed(HEADER_ROW, FIRST_ROW, NON_MEMBER_END, &[TOTAL]),
        )
        .with_region(TagRule::new(
            TagMatcher::vocabulary(&NON_MEMBER_REGIONS),
            TagTransform::Identity,
        ))
        .with_membership(Membership::NonMember)
        .excluding(&NON_MEMBER_EXCLUDED)
    };

    let layout = match kind {
        SourceKind::TotalProduction => producer(OutputSchema::ProducerCropYear, measures::PRODUCTION),
        SourceKind::DomesticConsumption => {
            producer(OutputSchema::ProducerCropYear, measures::CONSUMPTION)
        }
        SourceKind::GrossOpeningStocks => producer(OutputSchema::ProducerCropYear, measures::OPENSTOCK),
        SourceKind::ExportsCropYear => producer(OutputSchema::ProducerCropYear, measures::EXPORTS),
        SourceKind::ExportsCalendarYear => {
            producer(OutputSchema::ProducerCalendarYear, measures::EXPORTS)
        }
        SourceKind::Imports => member(measures::IMPORTS),
        SourceKind::ReExports => member(measures::RE_EXPORTS),
        SourceKind::NonMemberImports => non_member(measures::IMPORTS),
        SourceKind::NonMemberReExports => non_member(measures::RE_EXPORTS),
        SourceKind::GrowerPrices => TableLayout::new(
            OutputSchema::GrowerPrice,
            Measure::price(measures::GROWER_PRICE),
            DataWindow::to_end(HEADER_ROW, FIRST_ROW),
        )
        .with_group(TagRule::new(
            TagMatcher::vocabulary(&COFFEE_TYPES),
            TagTransform::Identity,
        )),
        SourceKind::IndicatorPrices => return None,
    };
    Some(layout)
}

/// Window of the indicator price sheet.
pub fn indicator_window() -> DataWindow {
    DataWindow::to_end(HEADER_ROW, FIRST_ROW)
}

pub fn harvest_group_rule() -> TagRule {
    TagRule::new(
        TagMatcher::vocabulary(&HARVEST_GROUPS),
        TagTransform::StripGroupSuffix,
    )
}

/// Region of a member importing country; unknown countries have none.
pub fn member_region(country: &str) -> Option<&'static str> {
    MEMBER_REGIONS
        .iter()
        .find(|(name, _)| *name == country)
        .map(|(_, region)| *region)
}

/// Producer names as spelled by the demographic source.
pub fn producer_crosswalk() -> Result<Crosswalk> {
    Ok(Crosswalk::new(PRODUCER_NAMES)?)
}

/// Importer names as spelled by the demographic source.
pub fn trade_crosswalk() -> Result<Crosswalk> {
    Ok(Crosswalk::new(TRADE_NAMES)?)
}

/// Dissolved entities whose population is synthesized from successors.
pub fn population_aggregates() -> Vec<AggregateEntity> {
    vec![
        AggregateEntity::new(
            "Yugoslavia SFR",
            ["Serbia", "Croatia", "Slovenia", "Bosnia and Herzegovina", "Macedonia"],
        ),
        AggregateEntity::new(
            "Netherlands Antilles (former)",
            [
                "Curacao",
                "Bonaire",
                "Aruba",
                "Sint Maarten (Dutch part)",
                "Sint Eustatius",
                "Saba",
                "Netherlands Antilles",
            ],
        ),
    ]
}

/// Belgium and Luxembourg reported jointly before `cutover_year`.
pub fn belgium_luxembourg(cutover_year: i32) -> SplitRule {
    SplitRule::new("Belgium/Luxembourg", "Belgium", "Luxembourg", cutover_year)
}
