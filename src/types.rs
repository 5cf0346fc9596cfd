use serde::{Deserialize, Serialize};

/// How an event's reference date recurs
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Category {
    /// One-off target date
    DDay,
    /// Inclusive count of days since the start date
    Anniversary,
    /// Same month and day every year
    Yearly,
    /// Same day of month every month
    Monthly,
    /// Any other stored tag, kept verbatim
    Unknown(String),
}

impl Category {
    /// Parse a stored category tag. Legacy Chinese tags are accepted.
    pub fn from_tag(s: &str) -> Self {
        match s.trim() {
            "D-DAY" => Category::DDay,
            "ANNIVERSARY" | "紀念日" => Category::Anniversary,
            "YEARLY" | "每年" => Category::Yearly,
            "MONTHLY" | "每月" => Category::Monthly,
            _ => Category::Unknown(s.to_string()),
        }
    }

    pub fn tag(&self) -> &str {
        match self {
            Category::DDay => "D-DAY",
            Category::Anniversary => "ANNIVERSARY",
            Category::Yearly => "YEARLY",
            Category::Monthly => "MONTHLY",
            Category::Unknown(tag) => tag,
        }
    }
}

impl From<String> for Category {
    fn from(s: String) -> Self {
        Category::from_tag(&s)
    }
}

impl From<Category> for String {
    fn from(c: Category) -> Self {
        c.tag().to_string()
    }
}

/// Stored countdown event
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Event {
    pub id: i64,
    pub title: String,
    /// Reference date as entered, `YYYY/M/D`
    pub date: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    pub category: Category,
    pub show_notification: bool,
    pub notify_100_days: bool,
    pub notify_yearly: bool,
    pub order: i64,
}

/// Fields supplied when creating or editing an event
#[derive(Debug, Clone)]
pub struct EventInput {
    pub title: String,
    pub date: String,
    pub image: Option<String>,
    pub category: Category,
    pub show_notification: bool,
    pub notify_100_days: bool,
    pub notify_yearly: bool,
}

impl EventInput {
    pub fn new(title: &str, date: &str, category: Category) -> Self {
        Self {
            title: title.to_string(),
            date: date.to_string(),
            image: None,
            category,
            show_notification: false,
            notify_100_days: true,
            notify_yearly: true,
        }
    }
}

impl From<&Event> for EventInput {
    fn from(event: &Event) -> Self {
        Self {
            title: event.title.clone(),
            date: event.date.clone(),
            image: event.image.clone(),
            category: event.category.clone(),
            show_notification: event.show_notification,
            notify_100_days: event.notify_100_days,
            notify_yearly: event.notify_yearly,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_from_tag() {
        assert_eq!(Category::from_tag("D-DAY"), Category::DDay);
        assert_eq!(Category::from_tag("紀念日"), Category::Anniversary);
        assert_eq!(Category::from_tag("每年"), Category::Yearly);
        assert_eq!(Category::from_tag("MONTHLY"), Category::Monthly);
    }

    #[test]
    fn test_category_unknown_keeps_tag() {
        let c = Category::from_tag("weekly");
        assert_eq!(c, Category::Unknown("weekly".to_string()));
        assert_eq!(c.tag(), "weekly");
        assert_eq!(Category::from_tag(""), Category::Unknown(String::new()));
    }

    #[test]
    fn test_category_serializes_as_tag() {
        let json = serde_json::to_string(&Category::Yearly).unwrap();
        assert_eq!(json, "\"YEARLY\"");
        let back: Category = serde_json::from_str("\"每月\"").unwrap();
        assert_eq!(back, Category::Monthly);
    }
}
