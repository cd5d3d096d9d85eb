use super::project::Project;

/// The built-in sample list written on first run, on a corrupted payload,
/// and by an explicit reset. `created_at` stamps every record.
pub fn seed_projects(created_at: &str) -> Vec<Project> {
    vec![
        Project {
            id: "p-rcm".into(),
            title: "Healthcare RCM Pipeline".into(),
            description: "Cloud ETL: Azure Data Factory + Databricks -> Azure SQL for reporting."
                .into(),
            tags: vec!["azure".into(), "etl".into(), "databricks".into()],
            github: String::new(),
            demo: String::new(),
            img: None,
            created_at: Some(created_at.to_string()),
            updated_at: None,
            starred: false,
            extra: serde_json::Map::new(),
        },
        Project {
            id: "p-nlp".into(),
            title: "Safety Intelligence (NLP)".into(),
            description:
                "NLP pipeline tagging injury causes from OSHA records; outputs to Power BI.".into(),
            tags: vec!["nlp".into(), "python".into(), "powerbi".into()],
            github: String::new(),
            demo: String::new(),
            img: None,
            created_at: Some(created_at.to_string()),
            updated_at: None,
            starred: true,
            extra: serde_json::Map::new(),
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn seed_has_one_starred_of_two() {
        let seed = seed_projects("2025-01-01T00:00:00.000Z");
        assert_eq!(seed.len(), 2);
        assert_eq!(seed.iter().filter(|p| p.starred).count(), 1);
        assert!(seed.iter().all(|p| p.created_at.is_some()));
    }
}
