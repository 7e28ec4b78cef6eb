//! Stage 2: Renaming
//!
//! Applies the folder and configuration renaming rules of the specification,
//! filling in the remote-side names on every record. Template paths and the
//! paths of referenced templates go through the folder rules; configuration
//! references go through the configuration rules keyed by `type/title`. A
//! name no rule matches is carried over unchanged.

use crate::config::CompiledSpec;
use crate::model::TemplateRecord;

pub fn execute(spec: &CompiledSpec, records: &mut [TemplateRecord]) {
    for record in records.iter_mut() {
        record.remote_path = Some(spec.folder_renames.rename(&record.path));
        for reference in &mut record.referenced_templates {
            reference.remote_path = Some(spec.folder_renames.rename(&reference.path));
        }
        for configuration in &mut record.referenced_configurations {
            let key = format!("{}/{}", configuration.kind, configuration.title);
            let remote_title = spec
                .configuration_renames
                .apply(&key)
                .unwrap_or_else(|| configuration.title.clone());
            configuration.remote_title = Some(remote_title);
        }
    }
}
