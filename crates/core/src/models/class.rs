use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Class {
    pub id: Uuid,
    pub user_id: Uuid,
    pub name: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Section {
    pub id: Uuid,
    pub user_id: Uuid,
    pub class_id: Uuid,
    pub name: String,
    pub created_at: DateTime<Utc>,
}

/// A class together with its sections, the shape the class selector works with.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassWithSections {
    #[serde(flatten)]
    pub class: Class,
    pub sections: Vec<Section>,
}

impl ClassWithSections {
    /// Groups sections under their classes, preserving the order of both lists.
    /// Sections whose class is not in `classes` are dropped.
    pub fn group(classes: Vec<Class>, sections: Vec<Section>) -> Vec<Self> {
        classes
            .into_iter()
            .map(|class| {
                let sections = sections
                    .iter()
                    .filter(|section| section.class_id == class.id)
                    .cloned()
                    .collect();
                ClassWithSections { class, sections }
            })
            .collect()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateClassRequest {
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateClassRequest {
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateSectionRequest {
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateSectionRequest {
    pub name: String,
}
