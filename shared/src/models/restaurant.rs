//! Restaurant models used while registering an owner account

use serde::{Deserialize, Serialize};

/// How the signup restaurant search interprets its query
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum SearchMode {
    #[default]
    Code,
    Name,
}

impl SearchMode {
    /// Value of the `type` query parameter
    pub fn as_param(&self) -> &'static str {
        match self {
            SearchMode::Code => "code",
            SearchMode::Name => "name",
        }
    }
}

/// A restaurant returned by the signup search
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct RestaurantSummary {
    pub id: i64,
    pub restaurant_name: String,
    #[serde(default)]
    pub branch_name: Option<String>,
    #[serde(default)]
    pub road_address: Option<String>,
    #[serde(default)]
    pub region_name: Option<String>,
    #[serde(default)]
    pub restaurant_code: Option<String>,
}

impl RestaurantSummary {
    /// Name shown in the search box once the restaurant is picked,
    /// e.g. "Choplan (Gangnam)"
    pub fn display_name(&self) -> String {
        match self.branch_name.as_deref().filter(|b| !b.is_empty()) {
            Some(branch) => format!("{} ({})", self.restaurant_name, branch),
            None => self.restaurant_name.clone(),
        }
    }
}

/// The existing restaurant an owner claims
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct RestaurantSelection {
    pub id: Option<i64>,
    pub code: Option<String>,
}

impl RestaurantSelection {
    pub fn is_empty(&self) -> bool {
        self.id.is_none() && self.code.as_deref().map_or(true, |c| c.trim().is_empty())
    }
}

impl From<&RestaurantSummary> for RestaurantSelection {
    fn from(summary: &RestaurantSummary) -> Self {
        Self {
            id: Some(summary.id),
            code: summary.restaurant_code.clone(),
        }
    }
}

/// Restaurant categories offered when registering a new restaurant
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
pub enum RestaurantCategory {
    #[default]
    #[serde(rename = "한식")]
    Korean,
    #[serde(rename = "중식")]
    Chinese,
    #[serde(rename = "일식")]
    Japanese,
    #[serde(rename = "양식")]
    Western,
    #[serde(rename = "카페/디저트")]
    CafeDessert,
    #[serde(rename = "분식")]
    Snack,
    #[serde(rename = "치킨")]
    Chicken,
    #[serde(rename = "피자")]
    Pizza,
    #[serde(rename = "패스트푸드")]
    FastFood,
    #[serde(rename = "아시안")]
    Asian,
    #[serde(rename = "뷔페")]
    Buffet,
    #[serde(rename = "기타")]
    Other,
}

impl RestaurantCategory {
    pub const ALL: [RestaurantCategory; 12] = [
        RestaurantCategory::Korean,
        RestaurantCategory::Chinese,
        RestaurantCategory::Japanese,
        RestaurantCategory::Western,
        RestaurantCategory::CafeDessert,
        RestaurantCategory::Snack,
        RestaurantCategory::Chicken,
        RestaurantCategory::Pizza,
        RestaurantCategory::FastFood,
        RestaurantCategory::Asian,
        RestaurantCategory::Buffet,
        RestaurantCategory::Other,
    ];

    /// Label used on the wire and in the category picker
    pub fn label(&self) -> &'static str {
        match self {
            RestaurantCategory::Korean => "한식",
            RestaurantCategory::Chinese => "중식",
            RestaurantCategory::Japanese => "일식",
            RestaurantCategory::Western => "양식",
            RestaurantCategory::CafeDessert => "카페/디저트",
            RestaurantCategory::Snack => "분식",
            RestaurantCategory::Chicken => "치킨",
            RestaurantCategory::Pizza => "피자",
            RestaurantCategory::FastFood => "패스트푸드",
            RestaurantCategory::Asian => "아시안",
            RestaurantCategory::Buffet => "뷔페",
            RestaurantCategory::Other => "기타",
        }
    }

    pub fn from_label(label: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|c| c.label() == label.trim())
    }
}

impl std::fmt::Display for RestaurantCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Details of a restaurant registered together with the owner account
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct NewRestaurant {
    pub name: String,
    pub branch_name: Option<String>,
    pub road_address: String,
    pub category: RestaurantCategory,
}

impl NewRestaurant {
    /// Name and road address are mandatory
    pub fn is_complete(&self) -> bool {
        !self.name.trim().is_empty() && !self.road_address.trim().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn summary(branch: Option<&str>) -> RestaurantSummary {
        RestaurantSummary {
            id: 12,
            restaurant_name: "촙플랜 식당".to_string(),
            branch_name: branch.map(str::to_string),
            road_address: Some("서울 강남구 테헤란로 1".to_string()),
            region_name: Some("강남구".to_string()),
            restaurant_code: Some("R-0012".to_string()),
        }
    }

    #[test]
    fn test_display_name() {
        assert_eq!(summary(Some("강남점")).display_name(), "촙플랜 식당 (강남점)");
        assert_eq!(summary(None).display_name(), "촙플랜 식당");
        assert_eq!(summary(Some("")).display_name(), "촙플랜 식당");
    }

    #[test]
    fn test_summary_wire_format() {
        let parsed: RestaurantSummary = serde_json::from_str(
            r#"{"id":3,"restaurantName":"Bap","restaurantCode":"R-3"}"#,
        )
        .unwrap();
        assert_eq!(parsed.id, 3);
        assert_eq!(parsed.branch_name, None);
        assert_eq!(parsed.restaurant_code.as_deref(), Some("R-3"));
    }

    #[test]
    fn test_category_labels() {
        assert_eq!(RestaurantCategory::default().label(), "한식");
        assert_eq!(
            serde_json::to_string(&RestaurantCategory::CafeDessert).unwrap(),
            "\"카페/디저트\""
        );
        for category in RestaurantCategory::ALL {
            assert_eq!(RestaurantCategory::from_label(category.label()), Some(category));
        }
        assert_eq!(RestaurantCategory::from_label("fusion"), None);
    }

    #[test]
    fn test_new_restaurant_completeness() {
        let mut restaurant = NewRestaurant::default();
        assert!(!restaurant.is_complete());
        restaurant.name = "새 식당".to_string();
        assert!(!restaurant.is_complete());
        restaurant.road_address = "부산 해운대구 1".to_string();
        assert!(restaurant.is_complete());
    }

    #[test]
    fn test_selection_from_summary() {
        let selection = RestaurantSelection::from(&summary(None));
        assert_eq!(selection.id, Some(12));
        assert_eq!(selection.code.as_deref(), Some("R-0012"));
        assert!(!selection.is_empty());
        assert!(RestaurantSelection::default().is_empty());
    }
}
