use serde::{Deserialize, Deserializer, Serialize, Serializer};

use super::ParseEnumError;

/// Macro to generate enum with as_str + std::str::FromStr pattern
macro_rules! str_enum {
    ($(#[$meta:meta])* $name:ident { $($variant:ident => $s:literal),+ $(,)? }) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
        pub enum $name {
            $($variant),+
        }

        impl $name {
            pub fn as_str(&self) -> &'static str {
                match self {
                    $(Self::$variant => $s),+
                }
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl std::str::FromStr for $name {
            type Err = ParseEnumError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $($s => Ok(Self::$variant)),+,
                    _ => Err(ParseEnumError {
                        field: stringify!($name).into(),
                        value: s.into(),
                    }),
                }
            }
        }

        impl Serialize for $name {
            fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
                serializer.serialize_str(self.as_str())
            }
        }

        impl<'de> Deserialize<'de> for $name {
            fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
                let s = String::deserialize(deserializer)?;
                s.parse().map_err(serde::de::Error::custom)
            }
        }
    };
}

str_enum!(
    /// Where a value sits relative to its optimal range.
    BiomarkerStatus {
        Optimal => "optimal",
        Deficient => "deficient",
        Excessive => "excessive",
    }
);

str_enum!(
    /// Ordered: a later variant always means a larger deviation.
    Severity {
        Low => "low",
        Medium => "medium",
        High => "high",
        Critical => "critical",
    }
);

str_enum!(PatternSeverity {
    Moderate => "moderate",
    Severe => "severe",
});

str_enum!(PatternType {
    Hypothyroid => "hypothyroid_pattern",
    InsulinResistance => "insulin_resistance_pattern",
    ChronicInflammation => "chronic_inflammation_pattern",
    NutrientDeficiency => "nutrient_deficiency_pattern",
    StressHormone => "stress_hormone_pattern",
});

str_enum!(FindingType {
    Critical => "critical",
    Important => "important",
    Strength => "strength",
});

str_enum!(
    /// The four scored categories, in weight order.
    HealthCategory {
        Thyroid => "thyroid",
        Metabolic => "metabolic",
        Inflammation => "inflammation",
        Nutrients => "nutrients",
    }
);

str_enum!(
    /// Recommendation buckets, declared in bucketing precedence order.
    RecommendationBucket {
        Immediate => "immediate",
        Lifestyle => "lifestyle",
        Supplements => "supplements",
        Monitoring => "monitoring",
        ShortTerm => "short_term",
    }
);

impl HealthCategory {
    pub const ALL: [HealthCategory; 4] = [
        Self::Thyroid,
        Self::Metabolic,
        Self::Inflammation,
        Self::Nutrients,
    ];
}

impl Severity {
    /// Impact contributed by an out-of-range value at this severity.
    pub fn impact(&self) -> u8 {
        match self {
            Self::Low => 15,
            Self::Medium => 40,
            Self::High => 70,
            Self::Critical => 90,
        }
    }
}

impl BiomarkerStatus {
    /// Short human label used in finding titles.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Optimal => "Optimal",
            Self::Deficient => "Low",
            Self::Excessive => "High",
        }
    }
}
