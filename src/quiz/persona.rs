use thiserror::Error;

use crate::quiz::content;

/// Persona used for any id the table doesn't know.
pub const DEFAULT_PERSONA_ID: &str = "pioneer";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Persona {
    pub id: &'static str,
    pub title: &'static str,
    pub subtitle: &'static str,
    pub description: &'static str,
    pub tags: &'static [&'static str],
}

#[derive(Error, Debug, PartialEq, Eq)]
pub enum PersonaError {
    #[error("Persona table is empty")]
    Empty,

    #[error("Default persona '{0}' is not in the table")]
    UnknownDefault(String),
}

#[derive(Debug, Clone)]
pub struct PersonaTable {
    personas: Vec<Persona>,
    default_index: usize,
}

impl PersonaTable {
    pub fn new(personas: Vec<Persona>, default_id: &str) -> Result<Self, PersonaError> {
        if personas.is_empty() {
            return Err(PersonaError::Empty);
        }
        let default_index = personas
            .iter()
            .position(|p| p.id == default_id)
            .ok_or_else(|| PersonaError::UnknownDefault(default_id.to_string()))?;
        Ok(Self {
            personas,
            default_index,
        })
    }

    pub fn builtin() -> Result<Self, PersonaError> {
        Self::new(content::PERSONAS.to_vec(), DEFAULT_PERSONA_ID)
    }

    pub fn ids(&self) -> Vec<&'static str> {
        self.personas.iter().map(|p| p.id).collect()
    }

    pub fn get(&self, id: &str) -> Option<&Persona> {
        let normalized = id.trim().to_lowercase();
        self.personas.iter().find(|p| p.id == normalized)
    }

    pub fn default_persona(&self) -> &Persona {
        &self.personas[self.default_index]
    }

    /// Case-insensitive, whitespace-tolerant lookup that never fails.
    pub fn resolve(&self, id: &str) -> &Persona {
        self.get(id).unwrap_or_else(|| self.default_persona())
    }
}
