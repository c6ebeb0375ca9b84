//! Output column names. These are part of the downstream contract.

pub const COUNTRY: &str = "country";
pub const HARVEST_GROUP: &str = "harvest_group";
pub const CROP_YEAR: &str = "crop_year";
pub const CROP_YEAR_BEG: &str = "crop_year_beg";
pub const CROP_YEAR_END: &str = "crop_year_end";
pub const CALENDAR_YEAR: &str = "calendar_year";
pub const REGION: &str = "region";
pub const ICO_MEMBER: &str = "ico_member";
pub const COFFEE_TYPE: &str = "coffee_type";

pub const YEAR: &str = "year";
pub const POPULATION_BOY: &str = "population_boy";
pub const POPULATION_MID: &str = "population_mid";
pub const POPULATION_BEG: &str = "population_beg";
pub const POPULATION_END: &str = "population_end";

pub const CATEGORY: &str = "category";
pub const MONTH: &str = "month";
pub const MONTH_NUM: &str = "month_num";
pub const INDICATOR_PRICE: &str = "indicator_price_us_cents_lb";
pub const ANNUAL_INDICATOR_PRICE: &str = "annual_indicator_price_us_cents_lb";
pub const GROWER_SHARE: &str = "grower_share_of_indicator";

/// Measure names used by the assembled tables.
pub mod measures {
    pub const OPENSTOCK: &str = "openstock";
    pub const PRODUCTION: &str = "production";
    pub const CONSUMPTION: &str = "consumption";
    pub const EXPORTS: &str = "exports";
    pub const CLOSESTOCK: &str = "closestock";
    pub const STOCK_ADJ: &str = "stock_adj";
    pub const IMPORTS: &str = "imports";
    pub const RE_EXPORTS: &str = "re_exports";
    pub const GROWER_PRICE: &str = "grower_price";
    pub const INDICATOR_PRICE: &str = "indicator_price";
}
