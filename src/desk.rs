use tracing::{info, warn};

use crate::error::DeskError;
use crate::lifecycle::{LifecycleEngine, NewWork, Priority, TransitionError, WorkItem};
use crate::permissions::{Actor, Operation, PermissionEvaluator, TranslatorOperation};
use crate::store::{StoreError, WorkFilter, WorkStore};
use crate::translator::{Translator, TranslatorRoster};

/// Editable descriptive fields. `None` leaves a field as it is.
#[derive(Debug, Clone, Default)]
pub struct WorkUpdate {
    pub name: Option<String>,
    pub author: Option<String>,
    pub description: Option<String>,
    pub notes: Option<String>,
    pub page_count: Option<u32>,
    pub word_count: Option<u32>,
}

/// Runs requests against works: authorize, load, apply, save.
///
/// Each call is one unit of work against the store. The desk never writes
/// a work unless the permission check and the lifecycle engine both
/// accepted the request.
pub struct WorkDesk<S: WorkStore> {
    store: S,
    // Without a roster any translator id is accepted.
    roster: Option<TranslatorRoster>,
}

impl<S: WorkStore> WorkDesk<S> {
    pub fn new(store: S) -> Self {
        Self {
            store,
            roster: None,
        }
    }

    /// Check assigned translator ids against `roster`.
    pub fn with_roster(mut self, roster: TranslatorRoster) -> Self {
        self.roster = Some(roster);
        self
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Create a draft work.
    pub fn create(&mut self, actor: &Actor, new: NewWork) -> Result<WorkItem, DeskError> {
        authorize(actor, Operation::Create, None)?;
        if new.name.trim().is_empty() {
            return Err(DeskError::Invalid("work name must not be empty".into()));
        }
        let work = WorkItem::create(new, Some(actor.id.clone()));
        self.store.insert(&work)?;
        info!(work_id = %work.id, actor = %actor.id, "work created");
        Ok(work)
    }

    pub fn get(&self, actor: &Actor, id: &str) -> Result<WorkItem, DeskError> {
        let work = self.load_active(id)?;
        authorize(actor, Operation::Retrieve, Some(&work))?;
        Ok(work)
    }

    pub fn list(&self, actor: &Actor, filter: &WorkFilter) -> Result<Vec<WorkItem>, DeskError> {
        authorize(actor, Operation::List, None)?;
        Ok(self.store.list(filter)?)
    }

    pub fn approve(&mut self, actor: &Actor, id: &str) -> Result<WorkItem, DeskError> {
        self.transition(actor, id, Operation::Approve, LifecycleEngine::approve)
    }

    /// Assign `translator_id` (or the work's already selected translator).
    ///
    /// With a roster configured, a non-blank id must name an active
    /// translator on it, else the request fails as not found.
    pub fn assign_translator(
        &mut self,
        actor: &Actor,
        id: &str,
        translator_id: Option<&str>,
    ) -> Result<WorkItem, DeskError> {
        let work = self.load_active(id)?;
        authorize(actor, Operation::AssignTranslator, Some(&work))?;

        if let Some(roster) = &self.roster
            && let Some(candidate) = translator_id.or(work.translator.as_deref())
            && !candidate.trim().is_empty()
            && !roster.is_assignable(candidate)
        {
            warn!(work_id = %work.id, translator = candidate, "unknown translator");
            return Err(DeskError::TranslatorNotFound(candidate.to_string()));
        }

        let updated = LifecycleEngine::assign_translator(&work, translator_id)?;
        self.store.save(&updated)?;
        Ok(updated)
    }

    /// Translators on the roster. Managers only.
    pub fn translators(&self, actor: &Actor) -> Result<Vec<Translator>, DeskError> {
        authorize_roster(actor, TranslatorOperation::List)?;
        Ok(self
            .roster
            .as_ref()
            .map(|r| r.list().into_iter().cloned().collect())
            .unwrap_or_default())
    }

    /// Add a translator to the roster, starting one if none is configured.
    pub fn register_translator(
        &mut self,
        actor: &Actor,
        translator: Translator,
    ) -> Result<Translator, DeskError> {
        authorize_roster(actor, TranslatorOperation::Create)?;
        if translator.id.trim().is_empty() || translator.full_name.trim().is_empty() {
            return Err(DeskError::Invalid(
                "translator id and name must not be empty".into(),
            ));
        }
        let roster = self.roster.get_or_insert_with(TranslatorRoster::new);
        roster.register(translator.clone())?;
        info!(translator = %translator.id, actor = %actor.id, "translator registered");
        Ok(translator)
    }

    pub fn start_trial(&mut self, actor: &Actor, id: &str) -> Result<WorkItem, DeskError> {
        self.transition(actor, id, Operation::StartTrial, LifecycleEngine::start_trial)
    }

    pub fn set_priority(
        &mut self,
        actor: &Actor,
        id: &str,
        priority: Priority,
    ) -> Result<WorkItem, DeskError> {
        let mut work = self.load_active(id)?;
        authorize(actor, Operation::PartialUpdate, Some(&work))?;
        work.set_priority(priority);
        self.store.save(&work)?;
        Ok(work)
    }

    pub fn update_details(
        &mut self,
        actor: &Actor,
        id: &str,
        update: WorkUpdate,
    ) -> Result<WorkItem, DeskError> {
        let mut work = self.load_active(id)?;
        authorize(actor, Operation::PartialUpdate, Some(&work))?;

        if let Some(name) = update.name {
            work.name = name;
        }
        if let Some(author) = update.author {
            work.author = author;
        }
        if let Some(description) = update.description {
            work.description = description;
        }
        if let Some(notes) = update.notes {
            work.notes = notes;
        }
        if let Some(pages) = update.page_count {
            work.page_count = pages;
        }
        if let Some(words) = update.word_count {
            work.word_count = words;
        }
        work.touch();

        self.store.save(&work)?;
        Ok(work)
    }

    /// Soft delete.
    pub fn deactivate(&mut self, actor: &Actor, id: &str) -> Result<WorkItem, DeskError> {
        let mut work = self.load_active(id)?;
        authorize(actor, Operation::Destroy, Some(&work))?;
        work.deactivate();
        self.store.save(&work)?;
        info!(work_id = %work.id, actor = %actor.id, "work deactivated");
        Ok(work)
    }

    /// Would `actor` be allowed `operation`, optionally on work `id`?
    pub fn can(&self, actor: &Actor, operation: Operation, id: Option<&str>) -> Result<bool, DeskError> {
        let work = id.map(|id| self.load_active(id)).transpose()?;
        Ok(PermissionEvaluator::can_perform(actor, operation, work.as_ref()))
    }

    fn transition(
        &mut self,
        actor: &Actor,
        id: &str,
        operation: Operation,
        apply: impl FnOnce(&WorkItem) -> Result<WorkItem, TransitionError>,
    ) -> Result<WorkItem, DeskError> {
        let work = self.load_active(id)?;
        authorize(actor, operation, Some(&work))?;
        let updated = apply(&work)?;
        self.store.save(&updated)?;
        Ok(updated)
    }

    // Inactive works are hidden from every default path.
    fn load_active(&self, id: &str) -> Result<WorkItem, DeskError> {
        let work = self.store.load(id)?;
        if !work.active {
            return Err(StoreError::NotFound(id.to_string()).into());
        }
        Ok(work)
    }
}

fn authorize(actor: &Actor, operation: Operation, work: Option<&WorkItem>) -> Result<(), DeskError> {
    if PermissionEvaluator::can_perform(actor, operation, work) {
        return Ok(());
    }
    warn!(
        actor = %actor.id,
        role = %actor.role,
        %operation,
        work_id = work.map(|w| w.id.as_str()).unwrap_or("-"),
        "permission denied"
    );
    Err(DeskError::Forbidden {
        role: actor.role,
        operation,
    })
}

fn authorize_roster(actor: &Actor, operation: TranslatorOperation) -> Result<(), DeskError> {
    if PermissionEvaluator::can_manage_translators(actor, operation) {
        return Ok(());
    }
    warn!(actor = %actor.id, role = %actor.role, ?operation, "roster access denied");
    Err(DeskError::RosterForbidden { role: actor.role })
}
