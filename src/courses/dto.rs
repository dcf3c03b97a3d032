use serde::Deserialize;

/// Shared body of course create and update requests.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CourseInput {
    pub title: String,
    pub img_url: String,
    pub description: String,
    pub learning_outcomes: Vec<String>,
    pub total_hours: String,
    pub duration: String,
    pub calendar_length: String,
    pub class_days: String,
    pub certification: String,
    #[serde(default)]
    pub kits_included: bool,
    pub price: i64,
    pub start_date: String,
    pub end_date: String,
    pub available_seats: i32,
}

impl CourseInput {
    /// Mirrors the required-fields check the API has always had.
    pub fn validate(&self) -> Result<(), String> {
        let required = [
            ("title", &self.title),
            ("imgUrl", &self.img_url),
            ("description", &self.description),
            ("totalHours", &self.total_hours),
            ("duration", &self.duration),
            ("calendarLength", &self.calendar_length),
            ("classDays", &self.class_days),
            ("certification", &self.certification),
            ("startDate", &self.start_date),
            ("endDate", &self.end_date),
        ];
        if required.iter().any(|(_, v)| v.trim().is_empty())
            || self.learning_outcomes.is_empty()
            || self.price <= 0
        {
            return Err("All fields are required".into());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> CourseInput {
        serde_json::from_value(serde_json::json!({
            "title": "Robotics 101",
            "imgUrl": "https://cdn.example/robotics.png",
            "description": "Intro to robotics",
            "learningOutcomes": ["Build a robot"],
            "totalHours": "40 Hours",
            "duration": "8 Weeks",
            "calendarLength": "8 weeks",
            "classDays": "Morning, Evening and Weekends",
            "certification": "Certificate of Completion",
            "kitsIncluded": true,
            "price": 100,
            "startDate": "2026-09-01",
            "endDate": "2026-10-27",
            "availableSeats": 25
        }))
        .unwrap()
    }

    #[test]
    fn accepts_complete_input() {
        assert!(sample().validate().is_ok());
    }

    #[test]
    fn rejects_empty_learning_outcomes() {
        let mut input = sample();
        input.learning_outcomes.clear();
        assert!(input.validate().is_err());
    }

    #[test]
    fn rejects_blank_title_and_non_positive_price() {
        let mut input = sample();
        input.title = "  ".into();
        assert!(input.validate().is_err());

        let mut input = sample();
        input.price = 0;
        assert!(input.validate().is_err());
    }

    #[test]
    fn kits_included_defaults_to_false() {
        let input: CourseInput = serde_json::from_value(serde_json::json!({
            "title": "T", "imgUrl": "u", "description": "d",
            "learningOutcomes": ["x"], "totalHours": "1", "duration": "1",
            "calendarLength": "1", "classDays": "1", "certification": "c",
            "price": 10, "startDate": "s", "endDate": "e", "availableSeats": 1
        }))
        .unwrap();
        assert!(!input.kits_included);
    }
}
