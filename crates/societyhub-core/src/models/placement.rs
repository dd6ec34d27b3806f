use serde::{Deserialize, Serialize};

use super::page::{ItemSummary, Summary};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum PlacementKind {
    #[serde(alias = "full-time", alias = "fulltime", alias = "FTE")]
    FullTime,
    #[serde(alias = "intern")]
    Internship,
    #[default]
    #[serde(other)]
    Other,
}

impl std::fmt::Display for PlacementKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PlacementKind::FullTime => write!(f, "Full-time"),
            PlacementKind::Internship => write!(f, "Internship"),
            PlacementKind::Other => write!(f, "Other"),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Placement {
    #[serde(default)]
    pub id: i64,
    #[serde(alias = "studentName", alias = "name")]
    pub student_name: String,
    pub company: String,
    #[serde(alias = "position", default)]
    pub role: Option<String>,
    /// Annual package in lakhs per annum.
    #[serde(alias = "packageLpa", alias = "package", default)]
    pub package_lpa: Option<f64>,
    #[serde(alias = "batch", default)]
    pub year: Option<i32>,
    #[serde(alias = "placementType", alias = "type", default)]
    pub kind: PlacementKind,
}

impl Placement {
    /// "12.5 LPA", "8 LPA", or "Undisclosed"
    pub fn package_display(&self) -> String {
        match self.package_lpa {
            Some(lpa) if lpa.fract() == 0.0 => format!("{} LPA", lpa as i64),
            Some(lpa) => format!("{:.1} LPA", lpa),
            None => "Undisclosed".to_string(),
        }
    }
}

impl Summary for Placement {
    fn summarize(&self) -> ItemSummary {
        let mut details = vec![
            ("Company", self.company.clone()),
            ("Type", self.kind.to_string()),
            ("Package", self.package_display()),
        ];
        if let Some(ref role) = self.role {
            details.push(("Role", role.clone()));
        }
        if let Some(year) = self.year {
            details.push(("Batch", year.to_string()));
        }

        ItemSummary {
            headline: self.student_name.clone(),
            meta: format!("{} · {}", self.company, self.package_display()),
            details,
            description: None,
            photos: vec![],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn placement(package: Option<f64>) -> Placement {
        Placement {
            id: 1,
            student_name: "Meera".to_string(),
            company: "Acme".to_string(),
            role: None,
            package_lpa: package,
            year: None,
            kind: PlacementKind::FullTime,
        }
    }

    #[test]
    fn test_package_display() {
        assert_eq!(placement(Some(12.5)).package_display(), "12.5 LPA");
        assert_eq!(placement(Some(8.0)).package_display(), "8 LPA");
        assert_eq!(placement(None).package_display(), "Undisclosed");
    }

    #[test]
    fn test_kind_parsing() {
        let p: Placement = serde_json::from_value(json!({
            "name": "Kabir", "company": "Initech", "type": "intern"
        }))
        .unwrap();
        assert_eq!(p.kind, PlacementKind::Internship);

        let p: Placement = serde_json::from_value(json!({
            "name": "Kabir", "company": "Initech", "type": "contract"
        }))
        .unwrap();
        assert_eq!(p.kind, PlacementKind::Other);
    }
}
