use serde::Serialize;

/// One recognized country of origin or birth.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Country {
    /// Canonical identifier, used to build metric names like `russia_origin_pct`.
    pub id: &'static str,
    /// Hebrew name as it appears in census extracts; used for matching.
    pub native: &'static str,
    /// English display name.
    pub english: &'static str,
    /// Flag glyph for operator-facing output.
    pub flag: &'static str,
}

/// Soviet and post-Soviet countries tracked by the census extract.
///
/// Declaration order is the matching order: `match_country` scans front to
/// back and the first containment hit wins, so the list must stay stable.
pub const COUNTRIES: &[Country] = &[
    Country {
        id: "russia",
        native: "רוסיה",
        english: "Russia",
        flag: "🇷🇺",
    },
    Country {
        id: "ukraine",
        native: "אוקראינה",
        english: "Ukraine",
        flag: "🇺🇦",
    },
    Country {
        id: "ussr",
        native: "ברה\"מ (לשעבר)",
        english: "Former USSR",
        flag: "🚩",
    },
    Country {
        id: "belarus",
        native: "בלרוס",
        english: "Belarus",
        flag: "🇧🇾",
    },
    Country {
        id: "moldova",
        native: "מולדובה",
        english: "Moldova",
        flag: "🇲🇩",
    },
    Country {
        id: "uzbekistan",
        native: "אוזבקיסטן",
        english: "Uzbekistan",
        flag: "🇺🇿",
    },
    Country {
        id: "azerbaijan",
        native: "אזרבייג'ן",
        english: "Azerbaijan",
        flag: "🇦🇿",
    },
    Country {
        id: "georgia",
        native: "גאורגיה",
        english: "Georgia",
        flag: "🇬🇪",
    },
    Country {
        id: "kazakhstan",
        native: "קזחסטן",
        english: "Kazakhstan",
        flag: "🇰🇿",
    },
    Country {
        id: "lithuania",
        native: "ליטא",
        english: "Lithuania",
        flag: "🇱🇹",
    },
    Country {
        id: "latvia",
        native: "לטביה",
        english: "Latvia",
        flag: "🇱🇻",
    },
    Country {
        id: "estonia",
        native: "אסטוניה",
        english: "Estonia",
        flag: "🇪🇪",
    },
    Country {
        id: "tajikistan",
        native: "טג'יקיסטן",
        english: "Tajikistan",
        flag: "🇹🇯",
    },
    Country {
        id: "turkmenistan",
        native: "טורקמניסטן",
        english: "Turkmenistan",
        flag: "🇹🇲",
    },
    Country {
        id: "kyrgyzstan",
        native: "קירגיזסטן",
        english: "Kyrgyzstan",
        flag: "🇰🇬",
    },
    Country {
        id: "armenia",
        native: "ארמניה",
        english: "Armenia",
        flag: "🇦🇲",
    },
];

/// Match a free-text country cell against the registry.
///
/// Containment is checked in both directions so that truncated cells
/// ("רוסי") and padded cells ("מדינת רוסיה") both resolve. Returns `None`
/// for empty or unrecognized text; census extracts carry plenty of
/// non-Soviet countries in the same columns and those simply don't
/// contribute.
pub fn match_country(name: &str) -> Option<&'static Country> {
    let name = name.trim();
    if name.is_empty() {
        return None;
    }
    COUNTRIES
        .iter()
        .find(|c| name.contains(c.native) || c.native.contains(name))
}
