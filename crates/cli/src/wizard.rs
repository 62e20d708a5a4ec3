//! Interactive schema wizard
//!
//! The wizard walks a user through four steps: name the project and its
//! entities, add fields to each entity, pick a cardinality for every entity
//! pair, then generate. Its state is an immutable [`WizardState`] snapshot;
//! every change goes through [`reduce`], which returns the next snapshot and
//! leaves the previous one untouched.
//!
//! [`run_prompts`] drives the state machine from line-based input so the
//! same flow works on a terminal and in tests.

use anyhow::{Context, Result, bail};
use colored::Colorize;
use forge_codegen::{GeneratedProject, Generator};
use forge_core::FieldType;
use forge_ir::{Entity, Field, RelationshipChoice, RelationshipDeclaration, SchemaProject};
use std::io::{BufRead, Write};

// ============================================================================
// State
// ============================================================================

/// Wizard steps, in order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum WizardStep {
    /// Project name and entity names
    #[default]
    Entities,
    /// Fields of each entity
    Fields,
    /// One cardinality per entity pair
    Relationships,
    /// Generated code
    Output,
}

impl WizardStep {
    pub fn display_name(&self) -> &'static str {
        match self {
            WizardStep::Entities => "Project & Tables",
            WizardStep::Fields => "Fields",
            WizardStep::Relationships => "Relationships",
            WizardStep::Output => "Generated Code",
        }
    }

    /// 1-based position shown to the user
    pub fn number(&self) -> usize {
        match self {
            WizardStep::Entities => 1,
            WizardStep::Fields => 2,
            WizardStep::Relationships => 3,
            WizardStep::Output => 4,
        }
    }
}

/// Snapshot of the wizard
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WizardState {
    pub step: WizardStep,
    pub project_name: String,
    /// Always holds at least one (possibly blank) entity
    pub entities: Vec<Entity>,
    pub current_entity: usize,
    pub relationships: Vec<RelationshipDeclaration>,
    pub generated: Option<GeneratedProject>,
}

impl Default for WizardState {
    fn default() -> Self {
        Self {
            step: WizardStep::default(),
            project_name: String::new(),
            entities: vec![Entity::new("")],
            current_entity: 0,
            relationships: Vec::new(),
            generated: None,
        }
    }
}

impl WizardState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Entities with a name, in entry order
    pub fn named_entities(&self) -> impl Iterator<Item = &Entity> {
        self.entities.iter().filter(|e| !e.is_blank())
    }

    /// A project name and at least two named entities
    pub fn can_leave_entities(&self) -> bool {
        !self.project_name.trim().is_empty() && self.named_entities().count() >= 2
    }

    /// Every pair has a complete choice
    pub fn can_generate(&self) -> bool {
        self.relationships.iter().all(|r| r.choice().is_some())
    }

    /// The schema described so far, blank entities left out
    pub fn to_project(&self) -> SchemaProject {
        SchemaProject {
            project_name: self.project_name.clone(),
            entities: self.named_entities().cloned().collect(),
            relationships: self.relationships.clone(),
        }
    }
}

// ============================================================================
// Actions
// ============================================================================

/// Everything the wizard can be asked to do
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WizardAction {
    SetStep(WizardStep),
    SetProjectName(String),
    AddEntity,
    RemoveEntity(usize),
    UpdateEntityName { index: usize, name: String },
    SetCurrentEntity(usize),
    AddField(usize),
    RemoveField { entity: usize, field: usize },
    UpdateFieldName { entity: usize, field: usize, name: String },
    UpdateFieldType { entity: usize, field: usize, field_type: FieldType },
    PrepareRelationships,
    ChooseRelationship { index: usize, choice: RelationshipChoice },
    SetGeneratedCode(GeneratedProject),
    Reset,
}

/// Apply an action to a snapshot, producing the next one.
///
/// Out-of-range indices leave the state unchanged.
pub fn reduce(state: &WizardState, action: WizardAction) -> WizardState {
    let mut next = state.clone();

    match action {
        WizardAction::SetStep(step) => next.step = step,
        WizardAction::SetProjectName(name) => next.project_name = name,
        WizardAction::AddEntity => next.entities.push(Entity::new("")),
        WizardAction::RemoveEntity(index) => {
            if next.entities.len() > 1 && index < next.entities.len() {
                next.entities.remove(index);
                next.current_entity = next.current_entity.min(next.entities.len() - 1);
            }
        }
        WizardAction::UpdateEntityName { index, name } => {
            if let Some(entity) = next.entities.get_mut(index) {
                entity.name = forge_core::sanitize_entity_name(&name);
            }
        }
        WizardAction::SetCurrentEntity(index) => {
            if index < next.entities.len() {
                next.current_entity = index;
            }
        }
        WizardAction::AddField(entity) => {
            if let Some(entity) = next.entities.get_mut(entity) {
                entity.add_field(Field::string(""));
            }
        }
        WizardAction::RemoveField { entity, field } => {
            if let Some(entity) = next.entities.get_mut(entity) {
                entity.remove_field(field);
            }
        }
        WizardAction::UpdateFieldName { entity, field, name } => {
            if let Some(f) = field_mut(&mut next, entity, field) {
                f.name = name;
            }
        }
        WizardAction::UpdateFieldType {
            entity,
            field,
            field_type,
        } => {
            if let Some(f) = field_mut(&mut next, entity, field) {
                f.field_type = field_type;
            }
        }
        WizardAction::PrepareRelationships => {
            next.relationships = state.to_project().pending_relationships();
        }
        WizardAction::ChooseRelationship { index, choice } => {
            if let Some(declaration) = next.relationships.get_mut(index) {
                declaration.apply(choice);
            }
        }
        WizardAction::SetGeneratedCode(project) => next.generated = Some(project),
        WizardAction::Reset => next = WizardState::default(),
    }

    next
}

fn field_mut(state: &mut WizardState, entity: usize, field: usize) -> Option<&mut Field> {
    state.entities.get_mut(entity)?.fields.get_mut(field)
}

// ============================================================================
// Prompt driver
// ============================================================================

/// Run the whole wizard over line-based input and return the final state.
///
/// The returned state is on [`WizardStep::Output`] with the output of
/// `generator` set.
pub fn run_prompts<R: BufRead, W: Write>(
    input: &mut R,
    output: &mut W,
    generator: &Generator,
) -> Result<WizardState> {
    let mut state = WizardState::new();

    // ── Step 1: project and entities ────────────────────────────────────
    heading(output, state.step)?;
    loop {
        let name = ask(input, output, "Project name: ")?;
        state = reduce(&state, WizardAction::SetProjectName(name));
        if !state.project_name.trim().is_empty() {
            break;
        }
        writeln!(output, "{}", "A project name is required.".yellow())?;
    }

    loop {
        let raw = ask(input, output, "Table name (blank to finish): ")?;
        if raw.trim().is_empty() {
            if state.can_leave_entities() {
                break;
            }
            writeln!(output, "{}", "Add at least two tables.".yellow())?;
            continue;
        }

        let index = match state.entities.iter().position(Entity::is_blank) {
            Some(index) => index,
            None => {
                state = reduce(&state, WizardAction::AddEntity);
                state.entities.len() - 1
            }
        };
        state = reduce(&state, WizardAction::UpdateEntityName { index, name: raw });

        let name = &state.entities[index].name;
        if name.is_empty() {
            writeln!(output, "{}", "Table names need at least one letter.".yellow())?;
        } else if state.entities.iter().filter(|e| &e.name == name).count() > 1 {
            writeln!(output, "{}", format!("'{name}' already exists.").yellow())?;
            state = reduce(&state, WizardAction::UpdateEntityName { index, name: String::new() });
        }
    }

    // ── Step 2: fields ──────────────────────────────────────────────────
    state = reduce(&state, WizardAction::SetStep(WizardStep::Fields));
    heading(output, state.step)?;
    writeln!(
        output,
        "Enter fields as name[:type], type one of {}.",
        FieldType::ALL.iter().map(FieldType::tag).collect::<Vec<_>>().join(", ")
    )?;

    let indices: Vec<usize> = state
        .entities
        .iter()
        .enumerate()
        .filter(|(_, e)| !e.is_blank())
        .map(|(i, _)| i)
        .collect();
    for index in indices {
        state = reduce(&state, WizardAction::SetCurrentEntity(index));
        let prompt = format!("  {} field (blank to finish): ", state.entities[index].name);

        loop {
            let line = ask(input, output, &prompt)?;
            if line.trim().is_empty() {
                break;
            }
            let (name, field_type) = parse_field(&line);
            let field = state.entities[index].fields.len();
            state = reduce(&state, WizardAction::AddField(index));
            state = reduce(&state, WizardAction::UpdateFieldName { entity: index, field, name });
            state = reduce(
                &state,
                WizardAction::UpdateFieldType { entity: index, field, field_type },
            );
        }
    }

    // ── Step 3: relationships ───────────────────────────────────────────
    state = reduce(&state, WizardAction::PrepareRelationships);
    state = reduce(&state, WizardAction::SetStep(WizardStep::Relationships));
    heading(output, state.step)?;

    for index in 0..state.relationships.len() {
        let (a, b) = {
            let d = &state.relationships[index];
            (d.entity_a.clone(), d.entity_b.clone())
        };
        writeln!(output, "{}", format!("{a} <-> {b}").bold())?;
        for (n, choice) in RelationshipChoice::ALL.iter().enumerate() {
            writeln!(output, "  {}) {}", n + 1, choice.label(&a, &b))?;
        }

        let choice = loop {
            let line = ask(input, output, "Choice: ")?;
            match parse_choice(&line) {
                Some(choice) => break choice,
                None => writeln!(output, "{}", "Pick a number from 1 to 4.".yellow())?,
            }
        };
        if let Some(preview) = choice.preview(&a, &b) {
            writeln!(output, "  {} {}", "->".dimmed(), preview)?;
        }
        state = reduce(&state, WizardAction::ChooseRelationship { index, choice });
    }

    // ── Step 4: generate ────────────────────────────────────────────────
    if !state.can_generate() {
        bail!("some relationships are still undecided");
    }
    let project = state.to_project();
    let generated = generator.generate(&project)?;
    state = reduce(&state, WizardAction::SetGeneratedCode(generated));
    state = reduce(&state, WizardAction::SetStep(WizardStep::Output));

    tracing::debug!(
        entities = project.entities.len(),
        relationships = project.relationships.len(),
        "Wizard finished"
    );

    Ok(state)
}

fn heading<W: Write>(output: &mut W, step: WizardStep) -> Result<()> {
    writeln!(
        output,
        "\n{}",
        format!("Step {}: {}", step.number(), step.display_name()).cyan().bold()
    )?;
    Ok(())
}

/// Print a prompt and read one trimmed line; running out of input is an error.
fn ask<R: BufRead, W: Write>(input: &mut R, output: &mut W, prompt: &str) -> Result<String> {
    write!(output, "{prompt}")?;
    output.flush()?;

    let mut line = String::new();
    let read = input.read_line(&mut line).context("failed to read input")?;
    if read == 0 {
        bail!("input ended before the wizard finished");
    }
    Ok(line.trim().to_string())
}

/// `title` or `plays:Integer`; unknown types fall back to String.
fn parse_field(line: &str) -> (String, FieldType) {
    match line.split_once(':') {
        Some((name, tag)) => (name.trim().to_string(), FieldType::from_tag(tag.trim())),
        None => (line.trim().to_string(), FieldType::String),
    }
}

fn parse_choice(line: &str) -> Option<RelationshipChoice> {
    let n: usize = line.trim().parse().ok()?;
    RelationshipChoice::ALL.get(n.checked_sub(1)?).copied()
}

// ============================================================================
// Tests
// ============================================================================
