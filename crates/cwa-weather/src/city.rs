//! The six special municipalities served by the proxy.

use std::fmt;

/// A city with a fixed route and a fixed upstream location name.
///
/// Cities are bound at routing time and never parsed from request input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum City {
    Taipei,
    NewTaipei,
    Taoyuan,
    Taichung,
    Tainan,
    Kaohsiung,
}

impl City {
    /// Every served city, in the order the endpoints are listed.
    pub const ALL: [City; 6] = [
        City::Taipei,
        City::NewTaipei,
        City::Taoyuan,
        City::Taichung,
        City::Tainan,
        City::Kaohsiung,
    ];

    /// Path segment under `/api/weather`.
    pub fn slug(self) -> &'static str {
        match self {
            City::Taipei => "taipei",
            City::NewTaipei => "newtaipei",
            City::Taoyuan => "taoyuan",
            City::Taichung => "taichung",
            City::Tainan => "tainan",
            City::Kaohsiung => "kaohsiung",
        }
    }

    /// Administrative name as the CWA dataset spells it (`locationName`).
    pub fn location_name(self) -> &'static str {
        match self {
            City::Taipei => "臺北市",
            City::NewTaipei => "新北市",
            City::Taoyuan => "桃園市",
            City::Taichung => "臺中市",
            City::Tainan => "臺南市",
            City::Kaohsiung => "高雄市",
        }
    }

    /// Full public path of this city's endpoint.
    pub fn endpoint(self) -> String {
        format!("/api/weather/{}", self.slug())
    }
}

impl fmt::Display for City {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.location_name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_slugs_and_names_are_unique() {
        let slugs: HashSet<_> = City::ALL.iter().map(|c| c.slug()).collect();
        let names: HashSet<_> = City::ALL.iter().map(|c| c.location_name()).collect();
        assert_eq!(slugs.len(), 6);
        assert_eq!(names.len(), 6);
    }

    #[test]
    fn test_endpoint_path() {
        assert_eq!(City::NewTaipei.endpoint(), "/api/weather/newtaipei");
        assert_eq!(City::Kaohsiung.endpoint(), "/api/weather/kaohsiung");
    }

    #[test]
    fn test_display_uses_upstream_name() {
        assert_eq!(City::Taichung.to_string(), "臺中市");
        assert_eq!(City::Taoyuan.to_string(), "桃園市");
    }
}
