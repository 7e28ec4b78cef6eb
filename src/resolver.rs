//! # Remote Resolution
//!
//! Cached lookups against the remote instance. A resolver lives for one
//! push run and remembers every answer it has seen: folder paths,
//! configuration searches and per-folder template listings are each asked
//! for at most once, including negative answers.
//!
//! Template lookups work by sweeping the full template listing of a folder
//! once and indexing it by title, so any number of title lookups in the
//! same folder cost one paginated listing.
//!
//! Ambiguities are resolved by picking the first match the server
//! reported, with a warning recorded once per lookup. Cache hits do not
//! repeat the warning.

use std::collections::HashMap;

use crate::cache::LookupCache;
use crate::error::Result;
use crate::remote::RemoteClient;

/// Page size used when sweeping the template listing of a remote folder.
pub const TEMPLATE_PAGE_SIZE: usize = 20;

/// Per-run cached view of the remote instance.
pub struct RemoteResolver<'a> {
    remote: &'a dyn RemoteClient,
    folder_ids: LookupCache<String, Option<String>>,
    configuration_ids: LookupCache<String, Option<String>>,
    folder_templates: LookupCache<String, HashMap<String, String>>,
}

impl<'a> RemoteResolver<'a> {
    pub fn new(remote: &'a dyn RemoteClient) -> Self {
        Self {
            remote,
            folder_ids: LookupCache::new(),
            configuration_ids: LookupCache::new(),
            folder_templates: LookupCache::new(),
        }
    }

    /// Identifier of the remote folder with the given path, if any.
    pub fn folder_id_by_path(&self, path: &str) -> Result<Option<String>> {
        self.folder_ids
            .get_or_try(path.to_string(), || self.remote.find_folder(path))
    }

    /// Identifier of the remote configuration with the given type and
    /// title, if any.
    ///
    /// When the server reports several matches the first one wins and a
    /// warning is recorded.
    pub fn configuration_id_by_kind_and_title(
        &self,
        kind: &str,
        title: &str,
        warnings: &mut Vec<String>,
    ) -> Result<Option<String>> {
        let key = format!("{}/{}", kind, title);
        self.configuration_ids.get_or_try(key, || {
            let matches = self.remote.find_configurations(kind, title)?;
            if matches.len() > 1 {
                warnings.push(format!(
                    "Found {} configurations by type [{}] and title [{}], choosing the first from: {:?}",
                    matches.len(),
                    kind,
                    title,
                    matches
                ));
            }
            Ok(matches.into_iter().next())
        })
    }

    /// Identifier of the template with the given title directly inside a
    /// remote folder, if any.
    pub fn template_id_by_folder_and_title(
        &self,
        folder_id: &str,
        title: &str,
        warnings: &mut Vec<String>,
    ) -> Result<Option<String>> {
        let titles = self
            .folder_templates
            .get_or_try(folder_id.to_string(), || {
                self.sweep_folder(folder_id, warnings)
            })?;
        Ok(titles.get(title).cloned())
    }

    /// List every template in a folder and index them by title.
    fn sweep_folder(
        &self,
        folder_id: &str,
        warnings: &mut Vec<String>,
    ) -> Result<HashMap<String, String>> {
        let mut titles: HashMap<String, String> = HashMap::new();
        let mut page = 0;
        loop {
            let batch =
                self.remote
                    .list_folder_templates(folder_id, page, TEMPLATE_PAGE_SIZE)?;
            if batch.is_empty() {
                break;
            }
            for summary in batch {
                if let Some(existing) = titles.get(&summary.title) {
                    warnings.push(format!(
                        "Found more than one template by title [{}] in remote folder [{}], \
                         choosing the first one: [{}]",
                        summary.title, folder_id, existing
                    ));
                } else {
                    titles.insert(summary.title, summary.id);
                }
            }
            page += 1;
        }
        Ok(titles)
    }
}
