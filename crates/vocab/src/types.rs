//! Closed enumerations for the selection categories.
//!
//! Each enum has a canonical lower-case code (`as_str`), a [`FromStr`] impl
//! that rejects anything else with [`VocabError::UnknownTerm`], and a
//! [`Display`](std::fmt::Display) impl that prints the code.

use std::fmt;
use std::str::FromStr;

use ukcp_calendar::{Period, Season};

use crate::error::VocabError;

macro_rules! closed_enum {
    (
        $(#[$meta:meta])*
        $name:ident, $category:literal {
            $( $(#[$vmeta:meta])* $variant:ident => $code:literal ),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
        pub enum $name {
            $( $(#[$vmeta])* $variant ),+
        }

        impl $name {
            /// Every variant, in declaration order.
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            /// Canonical code of the variant.
            pub fn as_str(self) -> &'static str {
                match self {
                    $($name::$variant => $code),+
                }
            }
        }

        impl FromStr for $name {
            type Err = VocabError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $($code => Ok($name::$variant),)+
                    _ => Err(VocabError::UnknownTerm {
                        category: $category,
                        value: s.to_string(),
                    }),
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl serde::Serialize for $name {
            fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
                serializer.serialize_str(self.as_str())
            }
        }
    };
}

// ---------------------------------------------------------------------------
// Input categories
// ---------------------------------------------------------------------------

closed_enum! {
    /// Selection category key.
    InputType, "input type" {
        Area => "area",
        Variable => "variable",
        Scenario => "scenario",
        SpatialRepresentation => "spatial_representation",
        TemporalAverageType => "temporal_average_type",
        TimePeriod => "time_period",
        TimeSliceType => "time_slice_type",
        Year => "year",
        YearMinimum => "year_minimum",
        YearMaximum => "year_maximum",
        Ensemble => "ensemble",
        HighlightedEnsembleMembers => "highlighted_ensemble_members",
        Baseline => "baseline",
        Collection => "collection",
        DataType => "data_type",
        ColourMode => "colour_mode",
        OverlayProbabilityLevels => "overlay_probability_levels",
        Percentiles => "percentiles",
        SamplingMethod => "sampling_method",
        SamplingId => "sampling_id",
        RandomSamplingCount => "random_sampling_count",
        SamplingVariable1 => "sampling_variable_1",
        SamplingVariable2 => "sampling_variable_2",
        SamplingTemporalAverage1 => "sampling_temporal_average_1",
        SamplingTemporalAverage2 => "sampling_temporal_average_2",
        SamplingPercentile1 => "sampling_percentile_1",
        SamplingPercentile2 => "sampling_percentile_2",
    }
}

impl InputType {
    /// Request-file key of the category.
    pub fn key(self) -> &'static str {
        self.as_str()
    }

    /// Returns `true` for categories that hold an ordered list of values.
    pub fn is_multi(self) -> bool {
        matches!(
            self,
            InputType::Variable
                | InputType::Scenario
                | InputType::Ensemble
                | InputType::HighlightedEnsembleMembers
                | InputType::Percentiles
                | InputType::SamplingId
        )
    }

    /// Vocabulary category the values are checked against.
    ///
    /// `None` marks a user-defined category whose values are not
    /// vocabulary terms (years, counts, flags, ids). The area category is
    /// parsed separately and also returns `None`.
    pub fn vocab_category(self) -> Option<&'static str> {
        match self {
            InputType::Variable | InputType::SamplingVariable1 | InputType::SamplingVariable2 => {
                Some("variable")
            }
            InputType::Scenario => Some("scenario"),
            InputType::SpatialRepresentation => Some("spatial_representation"),
            InputType::TemporalAverageType => Some("temporal_average_type"),
            InputType::TimePeriod
            | InputType::SamplingTemporalAverage1
            | InputType::SamplingTemporalAverage2 => Some("time_period"),
            InputType::TimeSliceType => Some("time_slice_type"),
            InputType::Ensemble | InputType::HighlightedEnsembleMembers => Some("ensemble"),
            InputType::Baseline => Some("baseline"),
            InputType::Collection => Some("collection"),
            InputType::DataType => Some("data_type"),
            InputType::ColourMode => Some("colour_mode"),
            InputType::Percentiles => Some("percentile"),
            InputType::SamplingMethod => Some("sampling_method"),
            InputType::Area
            | InputType::Year
            | InputType::YearMinimum
            | InputType::YearMaximum
            | InputType::OverlayProbabilityLevels
            | InputType::SamplingId
            | InputType::RandomSamplingCount
            | InputType::SamplingPercentile1
            | InputType::SamplingPercentile2 => None,
        }
    }
}

// ---------------------------------------------------------------------------
// Area
// ---------------------------------------------------------------------------

closed_enum! {
    /// Kind of spatial selection.
    AreaType, "area type" {
        Bbox => "bbox",
        Point => "point",
        CoastPoint => "coast_point",
        GaugePoint => "gauge_point",
        Country => "country",
        AdminRegion => "admin_region",
        RiverBasin => "river_basin",
    }
}

impl AreaType {
    /// Returns `true` for region-aggregated kinds.
    pub fn is_region(self) -> bool {
        self.region_token().is_some()
    }

    /// Token used for region kinds in paths, spatial representations and
    /// vocabulary categories (`river_basin` -> `river`, `admin_region` ->
    /// `region`).
    pub fn region_token(self) -> Option<&'static str> {
        match self {
            AreaType::Country => Some("country"),
            AreaType::AdminRegion => Some("region"),
            AreaType::RiverBasin => Some("river"),
            _ => None,
        }
    }

    /// Number of coordinates a list-form area of this kind carries.
    pub fn coordinate_count(self) -> Option<usize> {
        match self {
            AreaType::Bbox => Some(4),
            AreaType::Point | AreaType::CoastPoint | AreaType::GaugePoint => Some(2),
            _ => None,
        }
    }
}

// ---------------------------------------------------------------------------
// Dataset collections
// ---------------------------------------------------------------------------

closed_enum! {
    /// Dataset collection.
    Collection, "collection" {
        LandProb => "land-prob",
        LandGcm => "land-gcm",
        LandRcm => "land-rcm",
        LandCordex => "land-cordex",
        LandCpm => "land-cpm",
        LandObs => "land-obs",
    }
}

impl Collection {
    /// Probabilistic projections.
    pub fn is_probabilistic(self) -> bool {
        self == Collection::LandProb
    }

    /// Model simulations with named ensemble members.
    pub fn is_simulation(self) -> bool {
        matches!(
            self,
            Collection::LandGcm | Collection::LandRcm | Collection::LandCordex | Collection::LandCpm
        )
    }

    /// Regional climate model runs.
    pub fn is_regional_model(self) -> bool {
        matches!(self, Collection::LandRcm | Collection::LandCordex)
    }

    /// Gridded observations.
    pub fn is_observation(self) -> bool {
        self == Collection::LandObs
    }
}

// ---------------------------------------------------------------------------
// Temporal categories
// ---------------------------------------------------------------------------

closed_enum! {
    /// Temporal averaging granularity.
    TemporalAverageType, "temporal average type" {
        Annual => "ann",
        Seasonal => "seas",
        Monthly => "mon",
        Daily => "day",
        ThreeHourly => "3hr",
        Hourly => "1hr",
    }
}

impl TemporalAverageType {
    /// Hourly or 3-hourly data.
    pub fn is_sub_daily(self) -> bool {
        matches!(self, TemporalAverageType::ThreeHourly | TemporalAverageType::Hourly)
    }

    /// Sub-periods an anomaly is decomposed into, in meteorological-year
    /// order. Daily and sub-daily data use calendar months.
    pub fn periods(self) -> Vec<Period> {
        match self {
            TemporalAverageType::Annual => vec![Period::Annual],
            TemporalAverageType::Seasonal => Period::all_seasons(),
            _ => Period::all_months(),
        }
    }

    /// Averaging type matching a single period code (`ann`, a season or a
    /// month), as used by the subset-sampling temporal averages.
    pub fn for_period(period: Period) -> Self {
        match period {
            Period::Annual => TemporalAverageType::Annual,
            Period::Season(_) => TemporalAverageType::Seasonal,
            Period::Month(_) => TemporalAverageType::Monthly,
        }
    }
}

closed_enum! {
    /// Length of a probabilistic time slice.
    TimeSliceType, "time slice type" {
        OneYear => "1y",
        TwentyYear => "20y",
        ThirtyYear => "30y",
    }
}

/// A requested time period: every sub-period, or one of them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TimePeriod {
    /// `all`.
    All,
    /// A month, season or the annual period.
    Period(Period),
}

impl TimePeriod {
    /// Canonical code.
    pub fn as_str(self) -> &'static str {
        match self {
            TimePeriod::All => "all",
            TimePeriod::Period(p) => p.code(),
        }
    }

    /// Returns `true` for `all`.
    pub fn is_all(self) -> bool {
        self == TimePeriod::All
    }

    /// Returns `true` if `month` is selected.
    pub fn contains_month(self, month: u8) -> bool {
        match self {
            TimePeriod::All => (1..=12).contains(&month),
            TimePeriod::Period(p) => p.contains_month(month),
        }
    }

    /// The single season, if the period is one.
    pub fn season(self) -> Option<Season> {
        match self {
            TimePeriod::Period(Period::Season(s)) => Some(s),
            _ => None,
        }
    }
}

impl FromStr for TimePeriod {
    type Err = VocabError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s == "all" {
            return Ok(TimePeriod::All);
        }
        Period::from_code(s)
            .map(TimePeriod::Period)
            .map_err(|_| VocabError::UnknownTerm {
                category: "time period",
                value: s.to_string(),
            })
    }
}

impl fmt::Display for TimePeriod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl serde::Serialize for TimePeriod {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Probabilistic data
// ---------------------------------------------------------------------------

closed_enum! {
    /// Form of probabilistic data.
    DataType, "data type" {
        Cdf => "cdf",
        Percentile => "percentile",
        Sample => "sample",
    }
}

closed_enum! {
    /// How the sample dimension of probabilistic data is reduced.
    SamplingMethod, "sampling method" {
        All => "all",
        Id => "id",
        Random => "random",
        Subset => "subset",
    }
}

// ---------------------------------------------------------------------------
// Physical quantities
// ---------------------------------------------------------------------------

closed_enum! {
    /// Physical quantity class used to pick the data variable from a file.
    QuantityClass, "quantity" {
        Temperature => "temperature",
        PrecipitationRate => "precipitation_rate",
    }
}

impl QuantityClass {
    /// CF standard names accepted for this class.
    pub fn standard_names(self) -> &'static [&'static str] {
        match self {
            QuantityClass::Temperature => &[
                "air_temperature",
                "surface_temperature",
                "air_temperature_anomaly",
            ],
            QuantityClass::PrecipitationRate => &[
                "lwe_precipitation_rate",
                "precipitation_flux",
                "precipitation_rate",
                "precipitation_amount",
                "lwe_thickness_of_precipitation_amount",
            ],
        }
    }
}

impl<'de> serde::Deserialize<'de> for QuantityClass {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

/// Global-warming-level scenarios (`gwl2`, `gwl4`) are resolved against
/// the RCP8.5 global model runs.
pub fn is_global_warming_level(scenario: &str) -> bool {
    matches!(scenario, "gwl2" | "gwl4")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn input_type_codes_roundtrip() {
        for &t in InputType::ALL {
            assert_eq!(t.key().parse::<InputType>().unwrap(), t);
        }
    }

    #[test]
    fn multi_categories() {
        assert!(InputType::Scenario.is_multi());
        assert!(InputType::SamplingId.is_multi());
        assert!(!InputType::Year.is_multi());
        assert!(!InputType::SamplingVariable1.is_multi());
    }

    #[test]
    fn user_defined_categories() {
        assert_eq!(InputType::Year.vocab_category(), None);
        assert_eq!(InputType::RandomSamplingCount.vocab_category(), None);
        assert_eq!(InputType::SamplingVariable2.vocab_category(), Some("variable"));
    }

    #[test]
    fn area_region_tokens() {
        assert_eq!(AreaType::RiverBasin.region_token(), Some("river"));
        assert_eq!(AreaType::AdminRegion.region_token(), Some("region"));
        assert_eq!(AreaType::Country.region_token(), Some("country"));
        assert!(!AreaType::Bbox.is_region());
        assert_eq!(AreaType::Bbox.coordinate_count(), Some(4));
        assert_eq!(AreaType::GaugePoint.coordinate_count(), Some(2));
        assert_eq!(AreaType::Country.coordinate_count(), None);
    }

    #[test]
    fn unknown_collection() {
        let err = "land-foo".parse::<Collection>().unwrap_err();
        assert_eq!(err.to_string(), "unknown collection term: 'land-foo'");
    }

    #[test]
    fn collection_families() {
        assert!(Collection::LandProb.is_probabilistic());
        assert!(Collection::LandCordex.is_regional_model());
        assert!(Collection::LandCpm.is_simulation());
        assert!(!Collection::LandObs.is_simulation());
    }

    #[test]
    fn temporal_periods() {
        assert_eq!(TemporalAverageType::Annual.periods(), vec![Period::Annual]);
        assert_eq!(TemporalAverageType::Seasonal.periods().len(), 4);
        assert_eq!(TemporalAverageType::Hourly.periods().len(), 12);
        assert!(TemporalAverageType::ThreeHourly.is_sub_daily());
        assert!(!TemporalAverageType::Daily.is_sub_daily());
    }

    #[test]
    fn time_period_parse() {
        assert_eq!("all".parse::<TimePeriod>().unwrap(), TimePeriod::All);
        assert_eq!(
            "son".parse::<TimePeriod>().unwrap().season(),
            Some(Season::Son)
        );
        assert!("winter".parse::<TimePeriod>().is_err());
    }

    #[test]
    fn quantity_names() {
        assert!(QuantityClass::Temperature.standard_names().contains(&"air_temperature"));
        assert!("sea_level".parse::<QuantityClass>().is_err());
    }

    #[test]
    fn gwl_detection() {
        assert!(is_global_warming_level("gwl2"));
        assert!(is_global_warming_level("gwl4"));
        assert!(!is_global_warming_level("rcp85"));
        assert!(!is_global_warming_level("gwl3"));
        assert!(!is_global_warming_level("gwl"));
    }
}
