//! API calls about preserved objects.

use bytes::Bytes;
use serde_json::Value;

use super::formatter;
use super::service::{Caller, VersionedApiService};
use crate::error::ClientError;
use crate::objects::{
    ChecksumFormat, DiffSubset, FileCategory, FileChecksum, Params, PreservedObject,
    SIGNATURE_CATALOG_FILENAME, bare_druid,
};
use crate::parser::DocumentParser;

/// Typed calls for the `objects` endpoints.
///
/// Druids are accepted with or without the `druid:` prefix.
#[derive(Debug, Clone, Copy)]
pub struct ObjectsApi<'a> {
    service: &'a VersionedApiService,
}

impl<'a> ObjectsApi<'a> {
    pub fn new(service: &'a VersionedApiService) -> Self {
        Self { service }
    }

    /// `GET objects/{druid}.json` – the preserved object record.
    pub async fn object(&self, druid: &str) -> Result<PreservedObject, ClientError> {
        self.service
            .get_json(
                &format!("objects/{}.json", druid_segment(druid)?),
                Caller::for_object("object", druid),
            )
            .await
    }

    /// The current version of the preserved object.
    pub async fn current_version(&self, druid: &str) -> Result<u64, ClientError> {
        let object: PreservedObject = self
            .service
            .get_json(
                &format!("objects/{}.json", druid_segment(druid)?),
                Caller::for_object("current_version", druid),
            )
            .await?;
        Ok(object.current_version)
    }

    /// `POST objects/checksums` – checksums of the latest version of every
    /// object in `druids`, as CSV or JSON text.
    pub async fn checksums(
        &self,
        druids: &[&str],
        format: ChecksumFormat,
    ) -> Result<String, ClientError> {
        let params = Params::new()
            .with("druids", druids.to_vec())
            .with("format", format.as_str());
        let caller = Caller::new("checksums");
        let body = self.service.post("objects/checksums", &params, caller).await?;
        self.decode_text(body, "objects/checksums", caller)
    }

    /// `GET objects/{druid}/checksum` – checksums of the latest version's
    /// content files.
    pub async fn checksum(&self, druid: &str) -> Result<Vec<FileChecksum>, ClientError> {
        self.service
            .get_json(
                &format!("objects/{}/checksum", druid_segment(druid)?),
                Caller::for_object("checksum", druid),
            )
            .await
    }

    /// `GET objects/{druid}/file` – a single file, buffered.
    ///
    /// `version` defaults to the latest version on the server side.
    pub async fn file(
        &self,
        druid: &str,
        category: FileCategory,
        filepath: &str,
        version: Option<u64>,
    ) -> Result<Bytes, ClientError> {
        self.service
            .get(
                &format!("objects/{}/file", druid_segment(druid)?),
                &file_params(category, filepath, version),
                Caller::for_object("file", druid),
            )
            .await
    }

    /// `GET objects/{druid}/file` – a single file, delivered chunk by chunk
    /// to `on_data`.
    pub async fn file_streaming<F>(
        &self,
        druid: &str,
        category: FileCategory,
        filepath: &str,
        version: Option<u64>,
        on_data: F,
    ) -> Result<(), ClientError>
    where
        F: FnMut(Bytes),
    {
        self.service
            .get_streaming(
                &format!("objects/{}/file", druid_segment(druid)?),
                &file_params(category, filepath, version),
                Caller::for_object("file", druid),
                on_data,
            )
            .await
    }

    pub async fn content(
        &self,
        druid: &str,
        filepath: &str,
        version: Option<u64>,
    ) -> Result<Bytes, ClientError> {
        self.file(druid, FileCategory::Content, filepath, version)
            .await
    }

    pub async fn manifest(
        &self,
        druid: &str,
        filepath: &str,
        version: Option<u64>,
    ) -> Result<Bytes, ClientError> {
        self.file(druid, FileCategory::Manifest, filepath, version)
            .await
    }

    pub async fn metadata(
        &self,
        druid: &str,
        filepath: &str,
        version: Option<u64>,
    ) -> Result<Bytes, ClientError> {
        self.file(druid, FileCategory::Metadata, filepath, version)
            .await
    }

    /// Fetch the object's signature catalog and parse it with `parser`.
    pub async fn signature_catalog<P: DocumentParser>(
        &self,
        druid: &str,
        parser: &P,
    ) -> Result<P::Document, ClientError> {
        let path = format!("objects/{}/file", druid_segment(druid)?);
        let caller = Caller::for_object("signature_catalog", druid);
        let body = self
            .service
            .get(
                &path,
                &file_params(FileCategory::Manifest, SIGNATURE_CATALOG_FILENAME, None),
                caller,
            )
            .await?;
        self.parse_with(parser, &body, &path, caller)
    }

    /// Like [`signature_catalog`](Self::signature_catalog), but an object the
    /// catalog does not know yet yields `empty(druid)` instead of
    /// [`ClientError::NotFound`]. Every other failure is still returned.
    pub async fn signature_catalog_or_else<P, E>(
        &self,
        druid: &str,
        parser: &P,
        empty: E,
    ) -> Result<P::Document, ClientError>
    where
        P: DocumentParser,
        E: FnOnce(&str) -> P::Document,
    {
        match self.signature_catalog(druid, parser).await {
            Err(ClientError::NotFound(message)) => {
                tracing::debug!(druid, %message, "No signature catalog yet, using an empty one");
                Ok(empty(druid))
            }
            other => other,
        }
    }

    /// `POST objects/{druid}/content_diff` – how `content_metadata` differs
    /// from what is preserved, parsed with `parser`.
    ///
    /// `version` defaults to the latest version on the server side.
    pub async fn content_inventory_diff<P: DocumentParser>(
        &self,
        druid: &str,
        content_metadata: &str,
        subset: DiffSubset,
        version: Option<u64>,
        parser: &P,
    ) -> Result<P::Document, ClientError> {
        let mut params = Params::new()
            .with("content_metadata", content_metadata)
            .with("subset", subset.as_str());
        if let Some(version) = version {
            params.insert("version", version);
        }

        let path = format!("objects/{}/content_diff", druid_segment(druid)?);
        let caller = Caller::for_object("content_inventory_diff", druid);
        let body = self.service.post(&path, &params, caller).await?;
        self.parse_with(parser, &body, &path, caller)
    }

    /// The `shelve` subset of [`content_inventory_diff`](Self::content_inventory_diff)
    /// against the latest version.
    pub async fn shelve_content_diff<P: DocumentParser>(
        &self,
        druid: &str,
        content_metadata: &str,
        parser: &P,
    ) -> Result<P::Document, ClientError> {
        self.content_inventory_diff(druid, content_metadata, DiffSubset::Shelve, None, parser)
            .await
    }

    /// `GET objects/{druid}/primary_moab_location` – storage root of the
    /// primary copy.
    pub async fn primary_moab_location(&self, druid: &str) -> Result<String, ClientError> {
        let path = format!("objects/{}/primary_moab_location", druid_segment(druid)?);
        let caller = Caller::for_object("primary_moab_location", druid);
        let body = self.service.get(&path, &Params::new(), caller).await?;
        self.decode_text(body, &path, caller)
    }

    /// `GET objects/{druid}/validate_moab` – queue a moab validation and
    /// return the server's acknowledgement.
    pub async fn validate_moab(&self, druid: &str) -> Result<String, ClientError> {
        let path = format!("objects/{}/validate_moab", druid_segment(druid)?);
        let caller = Caller::for_object("validate_moab", druid);
        let body = self.service.get(&path, &Params::new(), caller).await?;
        self.decode_text(body, &path, caller)
    }

    fn decode_text(
        &self,
        body: Bytes,
        path: &str,
        caller: Caller<'_>,
    ) -> Result<String, ClientError> {
        String::from_utf8(body.to_vec())
            .map_err(|e| self.parse_failure(path, caller, &e.to_string()))
    }

    fn parse_with<P: DocumentParser>(
        &self,
        parser: &P,
        body: &[u8],
        path: &str,
        caller: Caller<'_>,
    ) -> Result<P::Document, ClientError> {
        parser
            .parse(body)
            .map_err(|e| self.parse_failure(path, caller, &e.to_string()))
    }

    fn parse_failure(&self, path: &str, caller: Caller<'_>, detail: &str) -> ClientError {
        let url = self
            .service
            .request_url(path)
            .map(String::from)
            .unwrap_or_else(|_| self.service.request_path(path));
        let message =
            formatter::format_parse_failure(&url, caller.object_id, caller.operation, detail);
        ClientError::UnexpectedResponse(message)
    }
}

/// Percent-encoded druid without its `druid:` prefix, for use as a path
/// segment.
///
/// An empty druid or one that would resolve as a `.`/`..` segment is
/// refused, since joining it onto the request path would address a
/// different resource.
pub(crate) fn druid_segment(druid: &str) -> Result<String, ClientError> {
    let bare = bare_druid(druid.trim()).trim();
    let decoded = urlencoding::decode(bare)
        .map_or_else(|_| bare.into(), |d| d.into_owned());
    if matches!(decoded.as_str(), "" | "." | "..") {
        return Err(ClientError::Configuration(format!(
            "{druid:?} is not a usable object identifier"
        )));
    }
    Ok(urlencoding::encode(bare).into_owned())
}

fn file_params(category: FileCategory, filepath: &str, version: Option<u64>) -> Params {
    let mut params = Params::new()
        .with("category", category.as_str())
        .with("filepath", filepath);
    if let Some(version) = version {
        params.insert("version", Value::from(version));
    }
    params
}
