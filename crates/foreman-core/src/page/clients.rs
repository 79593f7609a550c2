use std::sync::Arc;

use serde::Serialize;

use super::projects::ProjectListing;
use super::{CrudMessages, CrudPage, PageRecord};
use crate::clock::Clock;
use crate::error::ForemanError;
use crate::model::{Client, Project};
use crate::validate::{ClientForm, FormErrors};
use crate::view::{ClientFilter, ClientRow, Locale, client_rows};

impl PageRecord for Client {
    type Form = ClientForm;

    const MESSAGES: CrudMessages = CrudMessages {
        created: "Клиент успешно добавлен",
        updated: "Клиент обновлен",
        update_failed: "Ошибка при обновлении клиента",
        deleted: "Клиент удален",
        delete_failed: "Ошибка при удалении клиента",
    };

    fn validate(form: &ClientForm) -> Result<Self::Fields, FormErrors> {
        form.validate()
    }

    fn not_found(id: &str) -> ForemanError {
        ForemanError::ClientNotFound { id: id.to_string() }
    }
}

/// Summary cards above the client table.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClientStats {
    pub total: usize,
    pub companies: usize,
    pub individuals: usize,
    pub completed_projects: u32,
    pub total_budget: f64,
}

impl ClientStats {
    #[must_use]
    pub fn compute(clients: &[Client]) -> Self {
        let companies = clients.iter().filter(|c| c.kind.is_company()).count();
        Self {
            total: clients.len(),
            companies,
            individuals: clients.len() - companies,
            completed_projects: clients.iter().map(|c| c.completed_projects).sum(),
            total_budget: clients.iter().map(|c| c.total_budget).sum(),
        }
    }
}

/// The clients page: list, filter, CRUD and per-client project lookup.
pub struct ClientsPage {
    crud: CrudPage<Client>,
    pub filter: ClientFilter,
}

impl ClientsPage {
    pub fn new(seed: Vec<Client>, clock: Arc<dyn Clock>) -> Self {
        Self {
            crud: CrudPage::new(seed, clock),
            filter: ClientFilter::default(),
        }
    }

    #[must_use]
    pub const fn crud(&self) -> &CrudPage<Client> {
        &self.crud
    }

    pub const fn crud_mut(&mut self) -> &mut CrudPage<Client> {
        &mut self.crud
    }

    #[must_use]
    pub fn get(&self, id: &str) -> Option<&Client> {
        self.crud.store().get(id)
    }

    #[must_use]
    pub fn visible(&self) -> Vec<Client> {
        let all = self.crud.store().list();
        self.filter.apply(&all).into_iter().cloned().collect()
    }

    #[must_use]
    pub fn rows(&self, locale: &Locale) -> Vec<ClientRow> {
        client_rows(&self.visible(), locale)
    }

    /// Stats over every client, ignoring the filter.
    #[must_use]
    pub fn stats(&self) -> ClientStats {
        ClientStats::compute(&self.crud.store().list())
    }

    /// Projects for a client, matched by client name.
    pub fn client_projects(
        &self,
        id: &str,
        listing: &impl ProjectListing,
    ) -> Result<Vec<Project>, ForemanError> {
        let client = self.get(id).ok_or_else(|| Client::not_found(id))?;
        Ok(listing.projects_for_client(&client.name))
    }
}
