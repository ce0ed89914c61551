//! Version-aware script resolution

use super::{EngineVersion, ScriptError, ScriptIdentifier, ScriptResult, VersionTier};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;
use warden_config::{EngineConfig, ScriptsConfig, WardenConfig};

/// Threshold used if the configured one cannot be parsed
const FALLBACK_THRESHOLD: EngineVersion = EngineVersion::new(12, 1);

/// Who is asking for a script
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Access {
    /// Requests arriving from the outside; the internal namespace is off limits
    User,
    /// The console's own maintenance and health checks
    Internal,
}

/// A script picked for a particular engine version, with its text
#[derive(Debug, Clone)]
pub struct ResolvedScript {
    pub identifier: ScriptIdentifier,
    pub path: PathBuf,
    pub tier: VersionTier,
    pub text: String,
}

/// Maps identifiers and engine versions onto files in the store.
///
/// Lookup order for `category/name.sql` at a given tier:
///
/// 1. `<root>/<namespace>/<tier>/category/name.sql`
/// 2. `<root>/<namespace>/<common>/category/name.sql`
/// 3. `<root>/<override dir>/name.sql` when `category` has an override
/// 4. `<root>/category/name.sql`
///
/// An identifier that already names a tier or common directory
/// (`oracle/v12c/...`) is used exactly as given.
#[derive(Debug, Clone)]
pub struct ScriptResolver {
    scripts: ScriptsConfig,
    engine: EngineConfig,
    threshold: EngineVersion,
}

impl ScriptResolver {
    pub fn new(scripts: ScriptsConfig, engine: EngineConfig) -> Self {
        let threshold = engine
            .threshold()
            .map_or(FALLBACK_THRESHOLD, EngineVersion::from);
        Self {
            scripts,
            engine,
            threshold,
        }
    }

    pub fn from_config(config: &WardenConfig) -> Self {
        Self::new(config.scripts.clone(), config.engine.clone())
    }

    pub fn root(&self) -> &Path {
        &self.scripts.root
    }

    pub fn tier_for(&self, version: Option<&str>) -> VersionTier {
        VersionTier::from_version(version, self.threshold)
    }

    /// Refuse user access to the internal namespace
    pub fn check_access(&self, id: &ScriptIdentifier, access: Access) -> ScriptResult<()> {
        if access == Access::User && id.is_under(&self.scripts.internal_namespace) {
            return Err(ScriptError::AccessDenied(id.to_string()));
        }
        Ok(())
    }

    /// Candidate paths for `id` at `tier`, in lookup order
    pub fn candidates(&self, id: &ScriptIdentifier, tier: VersionTier) -> Vec<PathBuf> {
        let root = &self.scripts.root;

        let namespaced = id.tail().filter(|_| self.is_namespaced(id));

        if let Some(tail) = namespaced {
            if tail.len() > 1 && self.is_tier_dir(&tail[0]) {
                return vec![root.join(id.to_path())];
            }
        }

        let (namespace_dir, relative): (&str, &[String]) = match namespaced {
            Some(tail) => (id.first(), tail),
            None => (&self.scripts.namespace, id.segments()),
        };
        let relative_path: PathBuf = relative.iter().collect();
        let namespace_root = root.join(namespace_dir);

        let mut candidates = vec![
            namespace_root
                .join(tier.dir_name(&self.engine))
                .join(&relative_path),
            namespace_root
                .join(&self.scripts.common_dir)
                .join(&relative_path),
        ];

        if relative.len() > 1 {
            let category = relative[0].to_lowercase();
            if let Some(dir) = self.scripts.overrides.get(&category) {
                candidates.push(root.join(dir).join(id.file_name()));
            }
        }

        let direct = root.join(id.to_path());
        if !candidates.contains(&direct) {
            candidates.push(direct);
        }
        candidates
    }

    /// Resolve `identifier` to an existing file for `version`
    pub fn resolve(
        &self,
        identifier: &str,
        version: Option<&str>,
        access: Access,
    ) -> ScriptResult<PathBuf> {
        let id = ScriptIdentifier::parse(identifier)?;
        self.check_access(&id, access)?;
        let tier = self.tier_for(version);
        self.resolve_at(&id, tier)
    }

    /// Resolve and read a script
    pub fn load(
        &self,
        identifier: &str,
        version: Option<&str>,
        access: Access,
    ) -> ScriptResult<ResolvedScript> {
        let id = ScriptIdentifier::parse(identifier)?;
        self.check_access(&id, access)?;
        let tier = self.tier_for(version);
        let path = self.resolve_at(&id, tier)?;
        let text = fs::read_to_string(&path).map_err(|e| ScriptError::io(&path, e))?;

        Ok(ResolvedScript {
            identifier: id,
            path,
            tier,
            text,
        })
    }

    fn resolve_at(&self, id: &ScriptIdentifier, tier: VersionTier) -> ScriptResult<PathBuf> {
        let candidates = self.candidates(id, tier);
        match candidates.iter().find(|p| p.is_file()) {
            Some(path) => {
                debug!(identifier = %id, %tier, path = %path.display(), "Resolved script");
                Ok(path.clone())
            }
            None => {
                debug!(identifier = %id, %tier, tried = candidates.len(), "Script not found");
                Err(ScriptError::ScriptNotFound {
                    identifier: id.to_string(),
                    searched: candidates,
                })
            }
        }
    }

    fn is_namespaced(&self, id: &ScriptIdentifier) -> bool {
        id.is_under(&self.scripts.namespace) || id.is_under(&self.scripts.internal_namespace)
    }

    fn is_tier_dir(&self, segment: &str) -> bool {
        [
            &self.engine.legacy_tier_dir,
            &self.engine.modern_tier_dir,
            &self.scripts.common_dir,
        ]
        .iter()
        .any(|dir| dir.eq_ignore_ascii_case(segment))
    }
}
