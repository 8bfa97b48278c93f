//! In-memory project hierarchy with `os_id` uniqueness.

use std::collections::HashMap;

use osbill_core::{DomainError, DomainResult, PartnerId, ProjectId, Validate};

use crate::project::{Project, ProjectContact};

/// Registered projects, indexed by id and by OpenStack id.
#[derive(Debug, Default)]
pub struct ProjectDirectory {
    projects: HashMap<ProjectId, Project>,
    by_os_id: HashMap<String, ProjectId>,
}

impl ProjectDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Validate and store a new project.
    ///
    /// The parent, if any, must already be registered, so the hierarchy
    /// cannot contain cycles.
    pub fn register(&mut self, project: Project) -> DomainResult<ProjectId> {
        project.validate()?;

        if self.projects.contains_key(&project.id) {
            return Err(DomainError::conflict("project already exists"));
        }
        if self.by_os_id.contains_key(&project.os_id) {
            return Err(DomainError::conflict(format!(
                "project id {} is already registered",
                project.os_id
            )));
        }
        if let Some(parent) = project.parent {
            if !self.projects.contains_key(&parent) {
                return Err(DomainError::not_found());
            }
        }

        let id = project.id;
        tracing::debug!(project_id = %id, os_id = %project.os_id, "project registered");
        self.by_os_id.insert(project.os_id.clone(), id);
        self.projects.insert(id, project);
        Ok(id)
    }

    pub fn get(&self, id: ProjectId) -> Option<&Project> {
        self.projects.get(&id)
    }

    pub fn find_by_os_id(&self, os_id: &str) -> Option<&Project> {
        self.by_os_id.get(os_id).and_then(|id| self.projects.get(id))
    }

    pub fn children(&self, id: ProjectId) -> Vec<&Project> {
        let mut children: Vec<&Project> = self
            .projects
            .values()
            .filter(|p| p.parent == Some(id))
            .collect();
        children.sort_by(|a, b| a.name.cmp(&b.name));
        children
    }

    pub fn owned_by(&self, partner: PartnerId) -> Vec<&Project> {
        let mut owned: Vec<&Project> = self
            .projects
            .values()
            .filter(|p| p.owner == partner)
            .collect();
        owned.sort_by(|a, b| a.name.cmp(&b.name));
        owned
    }

    /// The project followed by its ancestors, nearest first.
    pub fn ancestry(&self, id: ProjectId) -> DomainResult<Vec<&Project>> {
        let mut chain = Vec::new();
        let mut current = self.projects.get(&id).ok_or_else(DomainError::not_found)?;
        loop {
            chain.push(current);
            match current.parent.and_then(|p| self.projects.get(&p)) {
                Some(parent) => current = parent,
                None => break,
            }
        }
        Ok(chain)
    }

    /// Own contacts plus every ancestor contact marked as inherited.
    pub fn effective_contacts(&self, id: ProjectId) -> DomainResult<Vec<&ProjectContact>> {
        let chain = self.ancestry(id)?;
        let (own, ancestors) = chain.split_first().ok_or_else(DomainError::not_found)?;

        let mut contacts: Vec<&ProjectContact> = own.contacts.iter().collect();
        for ancestor in ancestors {
            contacts.extend(ancestor.contacts.iter().filter(|c| c.inherit));
        }
        Ok(contacts)
    }

    /// Project whose invoice carries this project's usage.
    ///
    /// A project flagged `group_invoices` is invoiced with its parent; the
    /// walk stops at the first project that is not grouped.
    pub fn group_root(&self, id: ProjectId) -> DomainResult<&Project> {
        let chain = self.ancestry(id)?;
        let mut root = chain[0];
        for next in &chain[1..] {
            if !root.group_invoices {
                break;
            }
            root = next;
        }
        Ok(root)
    }

    pub fn len(&self) -> usize {
        self.projects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.projects.is_empty()
    }
}
