use anyhow::Result;

use crate::api::Backend;
use crate::error::AppError;
use crate::models::{ImageRepo, Outcome};
use crate::order::order;
use crate::retention::is_protected;
use crate::selection::Selection;

/// Client-side registry state: the last fetched image and repository lists,
/// plus whatever fetch errors accumulated while building them.
///
/// Data is replaced wholesale on every refresh; nothing is patched in place
/// after a mutation.
pub struct TagManager<B> {
    backend: B,
    verbose: bool,
    pub images: Vec<ImageRepo>,
    pub repositories: Vec<String>,
    pub errors: Vec<String>,
}

impl<B: Backend> TagManager<B> {
    pub fn new(backend: B, verbose: bool) -> Self {
        Self {
            backend,
            verbose,
            images: Vec::new(),
            repositories: Vec::new(),
            errors: Vec::new(),
        }
    }

    /// Fetch images and repositories. The two requests are independent: one
    /// failing neither blocks nor discards the other's result, so partial
    /// data is a valid steady state. Errors accumulate per failed call.
    pub async fn refresh(&mut self) {
        let (images, repositories) = tokio::join!(
            self.backend.fetch_images(),
            self.backend.fetch_repositories()
        );

        self.errors.clear();

        match images {
            Ok(resp) if resp.success => self.images = resp.data,
            Ok(resp) => self.errors.push(
                resp.message
                    .unwrap_or_else(|| "Failed to fetch images".to_string()),
            ),
            Err(e) => self.errors.push(format!("Failed to fetch images: {:#}", e)),
        }

        match repositories {
            Ok(resp) if resp.success => self.repositories = resp.data,
            Ok(resp) => self.errors.push(
                resp.message
                    .unwrap_or_else(|| "Failed to fetch repositories".to_string()),
            ),
            Err(e) => self
                .errors
                .push(format!("Failed to fetch repositories: {:#}", e)),
        }
    }

    /// Canonical tag order for one image, or None when the image is unknown.
    pub fn ordered_tags(&self, image: &str) -> Option<Vec<String>> {
        self.images
            .iter()
            .find(|repo| repo.image == image)
            .map(|repo| order(&repo.tags))
    }

    /// Open a tag-management session for one image. The selection is scoped
    /// to that image's current ordering and dies with it.
    pub fn open(&self, image: &str) -> Result<Selection, AppError> {
        self.ordered_tags(image)
            .map(Selection::new)
            .ok_or_else(|| AppError::UnknownImage(image.to_string()))
    }

    /// Delete a single tag behind the retention guard, then refetch.
    pub async fn delete_one(&mut self, image: &str, tag: &str) -> Result<()> {
        let ordered = self
            .ordered_tags(image)
            .ok_or_else(|| AppError::UnknownImage(image.to_string()))?;

        if is_protected(&ordered, tag) {
            return Err(AppError::ProtectedTag {
                tag: tag.to_string(),
            }
            .into());
        }

        let resp = self.backend.delete_tag(image, tag).await?;
        if !resp.success {
            let message = resp
                .message
                .unwrap_or_else(|| format!("could not delete {}:{}", image, tag));
            return Err(AppError::Api(message).into());
        }

        self.refresh().await;
        Ok(())
    }

    /// Delete every selected tag, one call at a time.
    ///
    /// The calls stay sequential: no parallel fan-out against the registry,
    /// and each failure attributes to exactly one tag. A failed tag never
    /// aborts the loop; every selected tag gets its attempt. Afterwards the
    /// data is refetched, the selection cleared, and the aggregate counts
    /// returned. This never fails as a whole.
    pub async fn delete_selected(&mut self, image: &str, selection: &mut Selection) -> Outcome {
        let mut outcome = Outcome::default();

        for tag in selection.selected_in_order() {
            // The selection cannot hold protected tags, but re-check against
            // the ordering before every call anyway.
            if is_protected(selection.ordered(), &tag) {
                eprintln!(
                    "[ERROR] Refusing to delete protected tag {}:{}",
                    image, tag
                );
                outcome.failed += 1;
                continue;
            }

            match self.backend.delete_tag(image, &tag).await {
                Ok(resp) if resp.success => {
                    if self.verbose {
                        eprintln!("[DEBUG] Deleted {}:{}", image, tag);
                    }
                    outcome.deleted += 1;
                }
                Ok(resp) => {
                    eprintln!(
                        "[ERROR] Failed to delete {}:{}: {}",
                        image,
                        tag,
                        resp.message.unwrap_or_else(|| "unknown error".to_string())
                    );
                    outcome.failed += 1;
                }
                Err(e) => {
                    eprintln!("[ERROR] Failed to delete {}:{}: {:#}", image, tag, e);
                    outcome.failed += 1;
                }
            }
        }

        self.refresh().await;
        selection.clear();
        outcome
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ActionResponse, ImagesResponse, RepositoriesResponse};
    use std::collections::HashSet;
    use std::sync::Mutex;

    struct StubBackend {
        images: Vec<ImageRepo>,
        repositories: Vec<String>,
        images_fail: bool,
        repos_fail: bool,
        failing_tags: HashSet<String>,
        deletes: Mutex<Vec<(String, String)>>,
        image_fetches: Mutex<usize>,
    }

    impl StubBackend {
        fn new(images: Vec<ImageRepo>, repositories: Vec<String>) -> Self {
            Self {
                images,
                repositories,
                images_fail: false,
                repos_fail: false,
                failing_tags: HashSet::new(),
                deletes: Mutex::new(Vec::new()),
                image_fetches: Mutex::new(0),
            }
        }

        fn repo(image: &str, tags: &[&str]) -> ImageRepo {
            ImageRepo {
                image: image.to_string(),
                tags: tags.iter().map(|s| s.to_string()).collect(),
            }
        }
    }

    impl Backend for &StubBackend {
        async fn fetch_images(&self) -> Result<ImagesResponse> {
            *self.image_fetches.lock().unwrap() += 1;
            if self.images_fail {
                Ok(ImagesResponse {
                    success: false,
                    message: Some("Failed to fetch images".to_string()),
                    data: Vec::new(),
                })
            } else {
                Ok(ImagesResponse {
                    success: true,
                    message: None,
                    data: self.images.clone(),
                })
            }
        }

        async fn fetch_repositories(&self) -> Result<RepositoriesResponse> {
            if self.repos_fail {
                Ok(RepositoriesResponse {
                    success: false,
                    message: Some("Failed to fetch repositories".to_string()),
                    data: Vec::new(),
                })
            } else {
                Ok(RepositoriesResponse {
                    success: true,
                    message: None,
                    data: self.repositories.clone(),
                })
            }
        }

        async fn delete_tag(&self, image: &str, tag: &str) -> Result<ActionResponse> {
            self.deletes
                .lock()
                .unwrap()
                .push((image.to_string(), tag.to_string()));
            if self.failing_tags.contains(tag) {
                Ok(ActionResponse {
                    success: false,
                    message: Some("backend refused".to_string()),
                })
            } else {
                Ok(ActionResponse {
                    success: true,
                    message: None,
                })
            }
        }
    }

    #[tokio::test]
    async fn test_refresh_partial_failure_keeps_other_dataset() {
        let mut stub = StubBackend::new(
            vec![StubBackend::repo("app/web", &["latest", "v1.0"])],
            vec!["app/web".to_string(), "app/api".to_string()],
        );
        stub.images_fail = true;

        let mut manager = TagManager::new(&stub, false);
        manager.refresh().await;

        assert_eq!(manager.repositories.len(), 2);
        assert!(manager.images.is_empty());
        assert_eq!(manager.errors, vec!["Failed to fetch images".to_string()]);
    }

    #[tokio::test]
    async fn test_open_orders_tags_and_guards_protected() {
        let stub = StubBackend::new(
            vec![StubBackend::repo(
                "app/web",
                &["v0.9", "v1.1", "latest", "v1.0", "v1.2"],
            )],
            vec![],
        );

        let mut manager = TagManager::new(&stub, false);
        manager.refresh().await;

        let mut selection = manager.open("app/web").unwrap();
        assert_eq!(
            selection.ordered(),
            ["latest", "v1.2", "v1.1", "v1.0", "v0.9"]
        );
        assert!(selection.toggle("v1.0"));
        assert!(!selection.toggle("v1.1"));
    }

    #[tokio::test]
    async fn test_open_unknown_image() {
        let stub = StubBackend::new(vec![], vec![]);
        let mut manager = TagManager::new(&stub, false);
        manager.refresh().await;

        assert!(matches!(
            manager.open("ghost"),
            Err(AppError::UnknownImage(_))
        ));
    }

    #[tokio::test]
    async fn test_bulk_delete_mixed_outcome_clears_selection() {
        let mut stub = StubBackend::new(
            vec![StubBackend::repo(
                "app/web",
                &["latest", "v1.2", "v1.1", "t1", "t2"],
            )],
            vec![],
        );
        stub.failing_tags.insert("t2".to_string());

        let mut manager = TagManager::new(&stub, false);
        manager.refresh().await;

        let mut selection = manager.open("app/web").unwrap();
        selection.toggle("t1");
        selection.toggle("t2");

        let outcome = manager.delete_selected("app/web", &mut selection).await;
        assert_eq!(outcome, Outcome { deleted: 1, failed: 1 });
        assert!(selection.is_empty());
        // Both tags were attempted despite the failure
        assert_eq!(stub.deletes.lock().unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_bulk_delete_is_sequential_in_display_order() {
        let stub = StubBackend::new(
            vec![StubBackend::repo(
                "app/web",
                &["latest", "v5", "v4", "v3", "v2", "v1"],
            )],
            vec![],
        );

        let mut manager = TagManager::new(&stub, false);
        manager.refresh().await;

        let mut selection = manager.open("app/web").unwrap();
        selection.toggle_select_all();
        let outcome = manager.delete_selected("app/web", &mut selection).await;

        assert_eq!(outcome, Outcome { deleted: 3, failed: 0 });
        let deletes = stub.deletes.lock().unwrap();
        let tags: Vec<&str> = deletes.iter().map(|(_, t)| t.as_str()).collect();
        assert_eq!(tags, ["v3", "v2", "v1"]);
    }

    #[tokio::test]
    async fn test_bulk_delete_refetches_afterwards() {
        let stub = StubBackend::new(
            vec![StubBackend::repo("app/web", &["latest", "a", "b", "c"])],
            vec![],
        );

        let mut manager = TagManager::new(&stub, false);
        manager.refresh().await;
        let fetches_before = *stub.image_fetches.lock().unwrap();

        let mut selection = manager.open("app/web").unwrap();
        selection.toggle("a");
        manager.delete_selected("app/web", &mut selection).await;

        assert_eq!(*stub.image_fetches.lock().unwrap(), fetches_before + 1);
    }

    #[tokio::test]
    async fn test_delete_one_protected_makes_no_backend_call() {
        let stub = StubBackend::new(
            vec![StubBackend::repo("app/web", &["latest", "v1.1", "v1.0", "v0.9"])],
            vec![],
        );

        let mut manager = TagManager::new(&stub, false);
        manager.refresh().await;

        let err = manager.delete_one("app/web", "v1.1").await.unwrap_err();
        assert!(matches!(
            err.downcast_ref::<AppError>(),
            Some(AppError::ProtectedTag { .. })
        ));
        assert!(stub.deletes.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_delete_one_surfaces_backend_refusal() {
        let mut stub = StubBackend::new(
            vec![StubBackend::repo("app/web", &["latest", "d", "c", "b", "a"])],
            vec![],
        );
        stub.failing_tags.insert("a".to_string());

        let mut manager = TagManager::new(&stub, false);
        manager.refresh().await;

        let err = manager.delete_one("app/web", "a").await.unwrap_err();
        assert!(matches!(
            err.downcast_ref::<AppError>(),
            Some(AppError::Api(_))
        ));
    }
}
