//! # Catalog
//!
//! Client-side view state: the loaded material list plus the derivation
//! that turns it into what the user sees (filter, then sort).

use std::cmp::Reverse;

use serde::{Deserialize, Serialize};
use smh_core::draft::MaterialDraft;
use smh_core::error::AppError;
use smh_core::filter::{FilterOptions, MaterialFilter};
use smh_core::models::StudyMaterial;
use uuid::Uuid;

use crate::error::Result;
use crate::prefs::{DownloadCounts, Preferences};
use crate::session::Session;
use crate::source::MaterialSource;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    /// Newest upload first.
    #[default]
    Date,
    /// Ascending by title.
    Title,
    /// Most downloaded first.
    Downloads,
}

/// Materials matching `filter`, ordered by `sort`.
///
/// Dates that do not parse sort after every valid date. Equal dates fall
/// back to id order, newest id first. The other orders are stable.
pub fn derive_view<'a>(
    materials: &'a [StudyMaterial],
    filter: &MaterialFilter,
    sort: SortOrder,
    downloads: &DownloadCounts,
) -> Vec<&'a StudyMaterial> {
    let mut visible: Vec<&StudyMaterial> = materials.iter().filter(|m| filter.matches(m)).collect();
    match sort {
        SortOrder::Date => visible.sort_by_key(|m| Reverse((m.uploaded_at(), m.id))),
        SortOrder::Title => visible.sort_by(|a, b| a.title.cmp(&b.title)),
        SortOrder::Downloads => visible.sort_by_key(|m| Reverse(downloads.get(m.id))),
    }
    visible
}

pub struct Catalog<S> {
    source: S,
    materials: Vec<StudyMaterial>,
}

impl<S: MaterialSource> Catalog<S> {
    pub fn new(source: S) -> Self {
        Self { source, materials: Vec::new() }
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    /// Replaces the in-memory list with everything the source holds.
    pub async fn load(&mut self) -> Result<()> {
        self.materials = self.source.fetch_materials(&FilterOptions::default()).await?;
        log::debug!("Loaded {} materials", self.materials.len());
        Ok(())
    }

    pub fn materials(&self) -> &[StudyMaterial] {
        &self.materials
    }

    pub fn visible(&self, filters: &FilterOptions, sort: SortOrder, prefs: &Preferences) -> Result<Vec<&StudyMaterial>> {
        let filter = filters.clone().into_filter()?;
        Ok(derive_view(&self.materials, &filter, sort, prefs.downloads()))
    }

    /// Creates at the source and appends the stored material.
    pub async fn add(&mut self, session: &Session, draft: &MaterialDraft) -> Result<StudyMaterial> {
        session.require_admin().await?;
        let created = self.source.create_material(draft).await?;
        self.materials.push(created.clone());
        Ok(created)
    }

    /// Deletes at the source, then drops the material and its preferences
    /// locally. Nothing local changes if the source refuses.
    pub async fn remove(&mut self, session: &Session, prefs: &mut Preferences, id: Uuid) -> Result<()> {
        session.require_admin().await?;
        self.source.delete_material(id).await?;
        self.materials.retain(|m| m.id != id);
        prefs.forget(id).await
    }

    /// Replaces the in-memory copy only. The source keeps the old version,
    /// so the edit is lost on the next [`load`](Self::load).
    pub async fn edit_local(&mut self, session: &Session, updated: StudyMaterial) -> Result<()> {
        session.require_admin().await?;
        let slot = self
            .materials
            .iter_mut()
            .find(|m| m.id == updated.id)
            .ok_or_else(|| AppError::not_found("Material", updated.id))?;
        *slot = updated;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::error::ClientError;
    use crate::local::LocalLibrary;
    use crate::session::AdminCredentials;
    use smh_core::models::{MaterialType, Semester};
    use smh_core::traits::KeyValueStore;
    use smh_storage_local::MemoryStore;

    fn material(title: &str, uploaded: &str) -> StudyMaterial {
        StudyMaterial {
            id: Uuid::now_v7(),
            title: title.into(),
            description: String::new(),
            subject: "CSE".into(),
            semester: Semester::try_from(1).unwrap(),
            kind: MaterialType::Pdf,
            link: "https://example.com".into(),
            tags: vec![],
            upload_date: uploaded.into(),
            author: "A".into(),
        }
    }

    fn titles(view: &[&StudyMaterial]) -> Vec<String> {
        view.iter().map(|m| m.title.clone()).collect()
    }

    #[test]
    fn test_sort_by_date_puts_unparsable_last() {
        let items = vec![
            material("old", "2023-01-01T00:00:00.000Z"),
            material("broken", "yesterday"),
            material("new", "2024-06-01T00:00:00.000Z"),
        ];
        let view = derive_view(&items, &MaterialFilter::default(), SortOrder::Date, &DownloadCounts::default());
        assert_eq!(titles(&view), vec!["new", "old", "broken"]);
    }

    #[test]
    fn test_sort_by_title_and_downloads() {
        let items = vec![
            material("beta", "2024-01-01T00:00:00.000Z"),
            material("Alpha", "2024-01-02T00:00:00.000Z"),
            material("alpha", "2024-01-03T00:00:00.000Z"),
        ];
        let view = derive_view(&items, &MaterialFilter::default(), SortOrder::Title, &DownloadCounts::default());
        assert_eq!(titles(&view), vec!["Alpha", "alpha", "beta"]);

        let downloads: DownloadCounts = [(items[1].id, 3), (items[2].id, 7)].into_iter().collect();
        let view = derive_view(&items, &MaterialFilter::default(), SortOrder::Downloads, &downloads);
        assert_eq!(titles(&view), vec!["alpha", "Alpha", "beta"]);
    }

    #[test]
    fn test_filter_applies_before_sort() {
        let mut items = vec![
            material("Graph Theory", "2024-01-01T00:00:00.000Z"),
            material("Fluid Mechanics", "2024-01-02T00:00:00.000Z"),
        ];
        items[1].subject = "MECH".into();

        let filter = FilterOptions::default().search("GRAPH").into_filter().unwrap();
        let view = derive_view(&items, &filter, SortOrder::Date, &DownloadCounts::default());
        assert_eq!(titles(&view), vec!["Graph Theory"]);

        let filter = FilterOptions::default().subject("MECH").into_filter().unwrap();
        let view = derive_view(&items, &filter, SortOrder::Date, &DownloadCounts::default());
        assert_eq!(titles(&view), vec!["Fluid Mechanics"]);
    }

    struct Fixture {
        catalog: Catalog<LocalLibrary>,
        session: Session,
        prefs: Preferences,
    }

    async fn fixture() -> Fixture {
        let store: Arc<dyn KeyValueStore> = Arc::new(MemoryStore::new());
        Fixture {
            catalog: Catalog::new(LocalLibrary::new(store.clone())),
            session: Session::new(store.clone(), AdminCredentials::default()),
            prefs: Preferences::load(store).await.unwrap(),
        }
    }

    fn draft(title: &str) -> MaterialDraft {
        MaterialDraft::new(
            title,
            "https://example.com/file.pdf",
            MaterialType::Pdf,
            "Faculty",
            Semester::try_from(4).unwrap(),
            "ISE",
        )
    }

    #[tokio::test]
    async fn test_mutations_require_login() {
        let mut f = fixture().await;
        let err = f.catalog.add(&f.session, &draft("Networks")).await.unwrap_err();
        assert!(matches!(err, ClientError::Unauthorized));

        f.session.login("RRCE", "RRCE@Study").await.unwrap();
        let added = f.catalog.add(&f.session, &draft("Networks")).await.unwrap();
        assert_eq!(f.catalog.materials(), &[added.clone()]);
        let id = added.id;

        f.session.logout().await.unwrap();
        let err = f.catalog.remove(&f.session, &mut f.prefs, id).await.unwrap_err();
        assert!(matches!(err, ClientError::Unauthorized));
        assert_eq!(f.catalog.materials().len(), 1);
    }

    #[tokio::test]
    async fn test_remove_clears_preferences() {
        let mut f = fixture().await;
        f.session.login("RRCE", "RRCE@Study").await.unwrap();
        let id = f.catalog.add(&f.session, &draft("Compilers")).await.unwrap().id;
        f.prefs.toggle_favorite(id).await.unwrap();
        f.prefs.increment_download(id).await.unwrap();

        f.catalog.remove(&f.session, &mut f.prefs, id).await.unwrap();
        assert!(f.catalog.materials().is_empty());
        assert!(!f.prefs.is_favorite(id));
        assert_eq!(f.prefs.download_count(id), 0);

        f.catalog.load().await.unwrap();
        assert!(f.catalog.materials().is_empty());
    }

    #[tokio::test]
    async fn test_edit_is_local_only() {
        let mut f = fixture().await;
        f.session.login("RRCE", "RRCE@Study").await.unwrap();
        let mut edited = f.catalog.add(&f.session, &draft("Databases")).await.unwrap();
        edited.title = "Database Systems".into();

        f.catalog.edit_local(&f.session, edited.clone()).await.unwrap();
        assert_eq!(f.catalog.materials()[0].title, "Database Systems");

        f.catalog.load().await.unwrap();
        assert_eq!(f.catalog.materials()[0].title, "Databases");

        edited.id = Uuid::now_v7();
        let err = f.catalog.edit_local(&f.session, edited).await.unwrap_err();
        assert!(matches!(err, ClientError::Domain(AppError::NotFound(..))));
    }

    #[tokio::test]
    async fn test_visible_uses_download_counts() {
        let mut f = fixture().await;
        f.session.login("RRCE", "RRCE@Study").await.unwrap();
        let first = f.catalog.add(&f.session, &draft("First")).await.unwrap().id;
        f.catalog.add(&f.session, &draft("Second")).await.unwrap();
        f.prefs.increment_download(first).await.unwrap();

        let view = f
            .catalog
            .visible(&FilterOptions::default(), SortOrder::Downloads, &f.prefs)
            .unwrap();
        assert_eq!(titles(&view), vec!["First", "Second"]);

        let err = f
            .catalog
            .visible(&FilterOptions::default().semester("nine"), SortOrder::Date, &f.prefs)
            .unwrap_err();
        assert!(matches!(err, ClientError::Domain(AppError::InvalidSemester(_))));
    }
}
