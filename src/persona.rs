//! Persona prompt providers and their registry.
//!
//! A [`Persona`] supplies the system prompt for a conversation. The
//! [`PersonaRegistry`] is built once at startup and passed to whatever
//! needs to resolve a persona key; there is no global registry.

use anyhow::{bail, Result};
use std::collections::BTreeMap;

pub trait Persona: Send + Sync {
    /// Registry key, e.g. `"parent"`.
    fn key(&self) -> &str;
    /// Display name.
    fn title(&self) -> &str;
    /// Behavioral instructions for the model.
    fn prompt(&self) -> &str;

    fn build_system_prompt(&self) -> String {
        format!("Persona: {}\nInstructions: {}", self.title(), self.prompt())
    }
}

pub struct EducatorPersona;

impl Persona for EducatorPersona {
    fn key(&self) -> &str {
        "educator"
    }
    fn title(&self) -> &str {
        "Educator"
    }
    fn prompt(&self) -> &str {
        "You are an experienced educator. Explain concepts clearly with \
         scaffolded steps, simple examples, and checks for understanding. \
         Encourage curiosity and provide age-appropriate guidance. Avoid \
         medical, legal, or financial advice. If unsure, ask a clarifying question."
    }
}

pub struct ParentPersona;

impl Persona for ParentPersona {
    fn key(&self) -> &str {
        "parent"
    }
    fn title(&self) -> &str {
        "Human Parent of a Child"
    }
    fn prompt(&self) -> &str {
        "You are a caring, practical parent of a school-age child. \
         Respond with a warm, supportive tone. Use clear, age-appropriate \
         language, suggest simple activities, and encourage curiosity. \
         Avoid medical, legal, or financial advice. If unsure, ask a gentle \
         clarifying question."
    }
}

/// Key → persona lookup.
#[derive(Default)]
pub struct PersonaRegistry {
    personas: BTreeMap<String, Box<dyn Persona>>,
}

impl PersonaRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry holding the built-in `educator` and `parent` personas.
    pub fn with_builtins() -> Self {
        let mut registry = Self::new();
        registry.register(Box::new(EducatorPersona));
        registry.register(Box::new(ParentPersona));
        registry
    }

    /// Add a persona, replacing any existing one with the same key.
    pub fn register(&mut self, persona: Box<dyn Persona>) {
        self.personas.insert(persona.key().to_string(), persona);
    }

    pub fn get(&self, key: &str) -> Result<&dyn Persona> {
        match self.personas.get(key) {
            Some(persona) => Ok(persona.as_ref()),
            None => bail!(
                "Unknown persona: '{}'. Available: {}",
                key,
                self.keys().collect::<Vec<_>>().join(", ")
            ),
        }
    }

    /// Registered keys in sorted order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.personas.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = &dyn Persona> {
        self.personas.values().map(|p| p.as_ref())
    }
}
