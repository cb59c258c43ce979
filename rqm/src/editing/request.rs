//! Edit request builders
//!
//! Each builder produces the HTTP call a MusicBrainz edit form would make.
//! Nothing here talks to the network; [`EditTransport`](super::EditTransport)
//! sends the result.

use std::collections::BTreeMap;
use std::fmt;

use reqwest::Url;
use serde::{Deserialize, Serialize};

use super::error::EditError;
use super::mbid::is_mbid;
use super::params::FormParams;

/// HTTP method of an edit request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Method {
    Get,
    Post,
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Method::Get => write!(f, "GET"),
            Method::Post => write!(f, "POST"),
        }
    }
}

/// Edit note and auto-edit flag shared by every edit form
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EditOptions {
    #[serde(rename = "edit-note", skip_serializing_if = "Option::is_none")]
    pub edit_note: Option<String>,

    /// Submit as an auto-edit (requires auto-editor privileges)
    #[serde(rename = "auto-edit")]
    pub auto_edit: bool,
}

impl EditOptions {
    fn apply(&self, form: &mut FormParams, prefix: &str) {
        form.append_or(prefix, "edit_note", self.edit_note.as_deref(), "")
            .append(prefix, "as_auto_editor", u8::from(self.auto_edit));
    }
}

/// A single HTTP call against the MusicBrainz server
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditRequest {
    pub method: Method,
    /// Absolute path, joined onto the configured base URL
    pub path: String,
    pub query: Vec<(String, String)>,
    pub form: FormParams,
    /// Safe to send again after a failure whose outcome is unknown.
    /// Edits that create something are not: a timeout after the server
    /// saved one would submit a duplicate.
    pub retryable: bool,
}

impl fmt::Display for EditRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.method, self.path)
    }
}

impl EditRequest {
    fn get(path: String) -> Self {
        Self {
            method: Method::Get,
            path,
            query: Vec::new(),
            form: FormParams::new(),
            retryable: true,
        }
    }

    fn post(path: String, form: FormParams, retryable: bool) -> Self {
        Self {
            method: Method::Post,
            path,
            query: Vec::new(),
            form,
            retryable,
        }
    }

    fn with_query(mut self, key: &str, value: impl ToString) -> Self {
        self.query.push((key.to_string(), value.to_string()));
        self
    }

    /// Full URL of this request against `base`
    ///
    /// A path on `base` is kept as a prefix, so a server mounted under
    /// `https://host/mb` receives `https://host/mb/edit/...`.
    pub fn url(&self, base: &Url) -> Result<Url, EditError> {
        let mut base = base.clone();
        if !base.path().ends_with('/') {
            let prefixed = format!("{}/", base.path());
            base.set_path(&prefixed);
        }
        let mut url = base
            .join(self.path.trim_start_matches('/'))
            .map_err(|e| EditError::InvalidRequest(format!("bad path {}: {}", self.path, e)))?;
        if !self.query.is_empty() {
            let mut pairs = url.query_pairs_mut();
            for (key, value) in &self.query {
                pairs.append_pair(key, value);
            }
        }
        Ok(url)
    }

    /// Relate two entities with a link type
    ///
    /// `entity0`/`entity1` are the ids the relationship editor expects, which
    /// are not necessarily MBIDs.
    pub fn create_relationship(
        type0: &str,
        type1: &str,
        entity0: &str,
        entity1: &str,
        link_type_id: u32,
        attributes: &BTreeMap<String, String>,
        options: &EditOptions,
    ) -> Result<Self, EditError> {
        let prefix = "ar";
        check_entity_type(type0)?;
        check_entity_type(type1)?;

        let mut form = FormParams::new();
        form.append(prefix, "link_type_id", link_type_id);
        options.apply(&mut form, prefix);
        for (name, value) in attributes {
            form.append(prefix, &format!("attrs.{}", name), value);
        }

        Ok(Self::post("/edit/relationship/create".to_string(), form, false)
            .with_query("type0", type0)
            .with_query("type1", type1)
            .with_query("entity0", entity0)
            .with_query("entity1", entity1))
    }

    pub fn create_work(
        name: &str,
        comment: Option<&str>,
        type_id: Option<u32>,
        options: &EditOptions,
    ) -> Result<Self, EditError> {
        let prefix = "edit-work";
        if name.trim().is_empty() {
            return Err(EditError::InvalidRequest("work name is empty".to_string()));
        }

        let mut form = FormParams::new();
        form.append(prefix, "name", name)
            .append_opt(prefix, "comment", comment)
            .append_or(prefix, "type_id", type_id, "");
        options.apply(&mut form, prefix);

        Ok(Self::post("/work/create".to_string(), form, false))
    }

    pub fn add_iswc(work_mbid: &str, iswc: &str, options: &EditOptions) -> Result<Self, EditError> {
        let prefix = "add-iswc";
        check_mbid(work_mbid)?;

        let mut form = FormParams::new();
        form.append(prefix, "iswc", iswc);
        options.apply(&mut form, prefix);

        Ok(Self::post(format!("/work/{}/add-iswc", work_mbid), form, false))
    }

    /// Edit an existing entity
    ///
    /// The edit form replaces every field it is given, so `fields` must hold
    /// the complete new state (unchanged values included).
    pub fn edit_entity(
        entity_type: &str,
        mbid: &str,
        fields: &BTreeMap<String, String>,
        options: &EditOptions,
    ) -> Result<Self, EditError> {
        check_entity_type(entity_type)?;
        check_mbid(mbid)?;
        let prefix = format!("edit-{}", entity_type);

        let mut form = FormParams::new();
        for (name, value) in fields {
            form.append(&prefix, name, value);
        }
        options.apply(&mut form, &prefix);

        Ok(Self::post(format!("/{}/{}/edit", entity_type, mbid), form, true))
    }

    pub fn approve_edit(edit_id: u64) -> Self {
        Self::get(format!("/edit/{}/approve", edit_id))
    }

    /// Web service lookup; the body is returned raw
    pub fn lookup(entity_type: &str, mbid: &str, inc: &[String]) -> Result<Self, EditError> {
        check_entity_type(entity_type)?;
        check_mbid(mbid)?;

        let request = Self::get(format!("/ws/2/{}/{}", entity_type, mbid));
        if inc.is_empty() {
            Ok(request)
        } else {
            // Encoded as `inc=a+b`
            Ok(request.with_query("inc", inc.join(" ")))
        }
    }
}

fn check_mbid(mbid: &str) -> Result<(), EditError> {
    if is_mbid(mbid) {
        Ok(())
    } else {
        Err(EditError::InvalidRequest(format!("not an MBID: {}", mbid)))
    }
}

fn check_entity_type(entity_type: &str) -> Result<(), EditError> {
    if !entity_type.is_empty() && entity_type.chars().all(|c| c.is_ascii_lowercase() || c == '_' || c == '-') {
        Ok(())
    } else {
        Err(EditError::InvalidRequest(format!("bad entity type: {:?}", entity_type)))
    }
}

/// One entry of a batch file
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum EditSpec {
    CreateRelationship {
        type0: String,
        type1: String,
        entity0: String,
        entity1: String,
        #[serde(rename = "link-type-id")]
        link_type_id: u32,
        #[serde(default)]
        attributes: BTreeMap<String, String>,
        #[serde(flatten)]
        options: EditOptions,
    },
    CreateWork {
        name: String,
        #[serde(default)]
        comment: Option<String>,
        #[serde(rename = "type-id", default)]
        type_id: Option<u32>,
        #[serde(flatten)]
        options: EditOptions,
    },
    AddIswc {
        work: String,
        iswc: String,
        #[serde(flatten)]
        options: EditOptions,
    },
    EditEntity {
        entity: String,
        mbid: String,
        fields: BTreeMap<String, String>,
        #[serde(flatten)]
        options: EditOptions,
    },
    ApproveEdit {
        #[serde(rename = "edit-id")]
        edit_id: u64,
    },
    Lookup {
        entity: String,
        mbid: String,
        #[serde(default)]
        inc: Vec<String>,
    },
}

impl EditSpec {
    pub fn to_request(&self) -> Result<EditRequest, EditError> {
        match self {
            EditSpec::CreateRelationship {
                type0,
                type1,
                entity0,
                entity1,
                link_type_id,
                attributes,
                options,
            } => EditRequest::create_relationship(type0, type1, entity0, entity1, *link_type_id, attributes, options),
            EditSpec::CreateWork {
                name,
                comment,
                type_id,
                options,
            } => EditRequest::create_work(name, comment.as_deref(), *type_id, options),
            EditSpec::AddIswc { work, iswc, options } => EditRequest::add_iswc(work, iswc, options),
            EditSpec::EditEntity {
                entity,
                mbid,
                fields,
                options,
            } => EditRequest::edit_entity(entity, mbid, fields, options),
            EditSpec::ApproveEdit { edit_id } => Ok(EditRequest::approve_edit(*edit_id)),
            EditSpec::Lookup { entity, mbid, inc } => EditRequest::lookup(entity, mbid, inc),
        }
    }
}

/// Batch file layout: `edits:` followed by a list of [`EditSpec`]s
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EditBatch {
    #[serde(default)]
    pub edits: Vec<EditSpec>,
}

#[cfg(test)]
mod tests {
    use super::*;

    const WORK: &str = "b10bbbfc-cf9e-42e0-be17-e2c3e1d2600d";

    fn base() -> Url {
        Url::parse("https://musicbrainz.org").unwrap()
    }

    #[test]
    fn test_create_relationship() {
        let mut attributes = BTreeMap::new();
        attributes.insert("additional".to_string(), "1".to_string());
        let options = EditOptions {
            edit_note: Some("from liner notes".to_string()),
            auto_edit: true,
        };

        let req = EditRequest::create_relationship("artist", "work", "123", "456", 168, &attributes, &options).unwrap();

        assert_eq!(req.method, Method::Post);
        assert_eq!(
            req.url(&base()).unwrap().as_str(),
            "https://musicbrainz.org/edit/relationship/create?type0=artist&type1=work&entity0=123&entity1=456"
        );
        assert_eq!(req.form.get("ar.link_type_id"), Some("168"));
        assert_eq!(req.form.get("ar.edit_note"), Some("from liner notes"));
        assert_eq!(req.form.get("ar.as_auto_editor"), Some("1"));
        assert_eq!(req.form.get("ar.attrs.additional"), Some("1"));
    }

    #[test]
    fn test_create_work_defaults() {
        let req = EditRequest::create_work("Requiem", None, None, &EditOptions::default()).unwrap();

        assert_eq!(req.path, "/work/create");
        assert_eq!(req.form.get("edit-work.name"), Some("Requiem"));
        assert_eq!(req.form.get("edit-work.comment"), None);
        assert_eq!(req.form.get("edit-work.type_id"), Some(""));
        assert_eq!(req.form.get("edit-work.edit_note"), Some(""));
        assert_eq!(req.form.get("edit-work.as_auto_editor"), Some("0"));
    }

    #[test]
    fn test_create_work_rejects_empty_name() {
        assert!(EditRequest::create_work("  ", None, None, &EditOptions::default()).is_err());
    }

    #[test]
    fn test_add_iswc() {
        let req = EditRequest::add_iswc(WORK, "T-345246800-1", &EditOptions::default()).unwrap();
        assert_eq!(req.path, format!("/work/{}/add-iswc", WORK));
        assert_eq!(req.form.get("add-iswc.iswc"), Some("T-345246800-1"));
    }

    #[test]
    fn test_add_iswc_rejects_bad_mbid() {
        let err = EditRequest::add_iswc("../../admin", "T-1", &EditOptions::default()).unwrap_err();
        assert!(matches!(err, EditError::InvalidRequest(_)));
    }

    #[test]
    fn test_edit_entity() {
        let mut fields = BTreeMap::new();
        fields.insert("name".to_string(), "Requiem in D minor".to_string());
        fields.insert("type_id".to_string(), "8".to_string());

        let req = EditRequest::edit_entity("work", WORK, &fields, &EditOptions::default()).unwrap();

        assert_eq!(req.to_string(), format!("POST /work/{}/edit", WORK));
        assert_eq!(req.form.get("edit-work.name"), Some("Requiem in D minor"));
        assert_eq!(req.form.get("edit-work.type_id"), Some("8"));
        assert_eq!(req.form.get("edit-work.as_auto_editor"), Some("0"));
    }

    #[test]
    fn test_edit_entity_rejects_bad_type() {
        let err = EditRequest::edit_entity("Work/..", WORK, &BTreeMap::new(), &EditOptions::default()).unwrap_err();
        assert!(matches!(err, EditError::InvalidRequest(_)));
    }

    #[test]
    fn test_lookup_inc_joined_with_plus() {
        let inc = vec!["artist-rels".to_string(), "aliases".to_string()];
        let req = EditRequest::lookup("work", WORK, &inc).unwrap();

        assert_eq!(req.method, Method::Get);
        assert_eq!(
            req.url(&base()).unwrap().as_str(),
            format!("https://musicbrainz.org/ws/2/work/{}?inc=artist-rels+aliases", WORK)
        );
    }

    #[test]
    fn test_approve_edit() {
        let req = EditRequest::approve_edit(42);
        assert_eq!(req.to_string(), "GET /edit/42/approve");
        assert!(req.form.is_empty());
    }

    #[test]
    fn test_url_keeps_base_path_prefix() {
        let req = EditRequest::approve_edit(42);
        for base in ["https://example.org/mb", "https://example.org/mb/"] {
            let base = Url::parse(base).unwrap();
            assert_eq!(req.url(&base).unwrap().as_str(), "https://example.org/mb/edit/42/approve");
        }
    }

    #[test]
    fn test_only_idempotent_requests_are_retryable() {
        let options = EditOptions::default();
        let mut fields = BTreeMap::new();
        fields.insert("name".to_string(), "Requiem".to_string());

        assert!(EditRequest::approve_edit(1).retryable);
        assert!(EditRequest::lookup("work", WORK, &[]).unwrap().retryable);
        assert!(EditRequest::edit_entity("work", WORK, &fields, &options).unwrap().retryable);

        assert!(!EditRequest::create_work("Requiem", None, None, &options).unwrap().retryable);
        assert!(!EditRequest::add_iswc(WORK, "T-345246800-1", &options).unwrap().retryable);
        let relationship =
            EditRequest::create_relationship("artist", "work", "1", "2", 168, &BTreeMap::new(), &options).unwrap();
        assert!(!relationship.retryable);
    }

    #[test]
    fn test_parse_batch() {
        let yaml = format!(
            r#"
edits:
  - kind: create-work
    name: Requiem
    type-id: 8
    edit-note: imported
  - kind: add-iswc
    work: {WORK}
    iswc: T-345246800-1
    auto-edit: true
  - kind: approve-edit
    edit-id: 7
"#
        );

        let batch: EditBatch = serde_yaml::from_str(&yaml).unwrap();
        assert_eq!(batch.edits.len(), 3);

        let first = batch.edits[0].to_request().unwrap();
        assert_eq!(first.form.get("edit-work.type_id"), Some("8"));
        assert_eq!(first.form.get("edit-work.edit_note"), Some("imported"));

        let second = batch.edits[1].to_request().unwrap();
        assert_eq!(second.form.get("add-iswc.as_auto_editor"), Some("1"));

        assert_eq!(batch.edits[2].to_request().unwrap().path, "/edit/7/approve");
    }
}
