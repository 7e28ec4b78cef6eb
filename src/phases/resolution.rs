//! Stage 3: Resolution
//!
//! Maps the renamed names of folders, templates and configurations onto
//! identifiers on the target instance. Every lookup goes through the
//! [`RemoteResolver`](crate::resolver::RemoteResolver) so each folder path,
//! configuration name and folder listing hits the remote API at most once.
//!
//! The distinct parent folder paths are prefetched in parallel before the
//! records are filled in sequentially from the warm cache. A template whose
//! renamed path has no folder segment belongs to the root folder, which
//! always exists.

use std::collections::BTreeSet;
use std::sync::Mutex;

use indexmap::IndexMap;
use rayon::prelude::*;

use crate::error::{Error, Result};
use crate::model::{TemplateRecord, ROOT_FOLDER_ID};
use crate::path;
use crate::resolver::RemoteResolver;

pub fn execute(
    resolver: &RemoteResolver,
    records: &mut [TemplateRecord],
    warnings: &mut Vec<String>,
) -> Result<()> {
    resolve_folders(resolver, records)?;
    resolve_templates(resolver, records, warnings)?;
    resolve_configurations(resolver, records, warnings)?;
    Ok(())
}

fn resolve_folders(resolver: &RemoteResolver, records: &mut [TemplateRecord]) -> Result<()> {
    let mut parents = BTreeSet::new();
    for record in records.iter() {
        if let Some(parent) = remote_parent(record.remote_path.as_deref()) {
            parents.insert(parent);
        }
        for reference in &record.referenced_templates {
            if let Some(parent) = remote_parent(reference.remote_path.as_deref()) {
                parents.insert(parent);
            }
        }
    }

    let failures: Mutex<Vec<Error>> = Mutex::new(Vec::new());
    parents.par_iter().for_each(|parent| {
        if let Err(error) = resolver.folder_id_by_path(parent) {
            failures.lock().unwrap().push(error);
        }
    });
    if let Some(error) = failures.into_inner().unwrap().into_iter().next() {
        return Err(error);
    }

    for record in records.iter_mut() {
        record.remote_folder_id = folder_of(resolver, record.remote_path.as_deref())?;
        for reference in &mut record.referenced_templates {
            reference.remote_folder_id = folder_of(resolver, reference.remote_path.as_deref())?;
        }
    }
    Ok(())
}

fn remote_parent(remote_path: Option<&str>) -> Option<String> {
    remote_path.and_then(path::parent).map(str::to_string)
}

fn folder_of(resolver: &RemoteResolver, remote_path: Option<&str>) -> Result<Option<String>> {
    match remote_path.and_then(path::parent) {
        Some(parent) => resolver.folder_id_by_path(parent),
        None => Ok(Some(ROOT_FOLDER_ID.to_string())),
    }
}

fn resolve_templates(
    resolver: &RemoteResolver,
    records: &mut [TemplateRecord],
    warnings: &mut Vec<String>,
) -> Result<()> {
    for record in records.iter_mut() {
        record.remote_template_id = existing_template(
            resolver,
            record.remote_path.as_deref(),
            record.remote_folder_id.as_deref(),
            warnings,
        )?;
        for reference in &mut record.referenced_templates {
            reference.remote_template_id = existing_template(
                resolver,
                reference.remote_path.as_deref(),
                reference.remote_folder_id.as_deref(),
                warnings,
            )?;
        }
    }
    Ok(())
}

fn existing_template(
    resolver: &RemoteResolver,
    remote_path: Option<&str>,
    remote_folder_id: Option<&str>,
    warnings: &mut Vec<String>,
) -> Result<Option<String>> {
    let folder_id = match remote_folder_id {
        Some(folder_id) => folder_id,
        None => return Ok(None),
    };
    let remote_path = match remote_path {
        Some(remote_path) => remote_path,
        None => return Ok(None),
    };
    resolver.template_id_by_folder_and_title(folder_id, path::name(remote_path), warnings)
}

fn resolve_configurations(
    resolver: &RemoteResolver,
    records: &mut [TemplateRecord],
    warnings: &mut Vec<String>,
) -> Result<()> {
    let mut resolved: IndexMap<String, Option<String>> = IndexMap::new();
    for record in records.iter() {
        for configuration in &record.referenced_configurations {
            if resolved.contains_key(&configuration.id) {
                continue;
            }
            let title = configuration
                .remote_title
                .as_deref()
                .unwrap_or(&configuration.title);
            let remote_id =
                resolver.configuration_id_by_kind_and_title(&configuration.kind, title, warnings)?;
            resolved.insert(configuration.id.clone(), remote_id);
        }
    }

    for record in records.iter_mut() {
        for configuration in &mut record.referenced_configurations {
            if let Some(remote_id) = resolved.get(&configuration.id) {
                configuration.remote_configuration_id = remote_id.clone();
            }
        }
    }
    Ok(())
}
