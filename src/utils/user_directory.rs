use std::collections::BTreeMap;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use actix_web::web;
use moka::future::Cache;
use quick_xml::{Reader, events::Event};

use crate::error::PresenceError;
use crate::model::user::UserEntry;

/// Users known to the intranet, keyed by user id.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct UserDirectory {
    users: BTreeMap<u64, UserEntry>,
}

impl UserDirectory {
    /// Entries in ascending user id order.
    pub fn iter(&self) -> impl Iterator<Item = (u64, &UserEntry)> {
        self.users.iter().map(|(id, entry)| (*id, entry))
    }

    pub fn len(&self) -> usize {
        self.users.len()
    }

    pub fn is_empty(&self) -> bool {
        self.users.is_empty()
    }
}

#[derive(Default)]
struct ServerInfo {
    protocol: Option<String>,
    host: Option<String>,
    port: Option<String>,
}

impl ServerInfo {
    fn url(&self) -> Option<String> {
        Some(format!(
            "{}://{}:{}",
            self.protocol.as_deref()?,
            self.host.as_deref()?,
            self.port.as_deref()?
        ))
    }
}

#[derive(Default)]
struct UserDraft {
    id: Option<u64>,
    name: Option<String>,
    avatar: Option<String>,
}

/// Stores element text according to its `<parent><leaf>` position.
fn assign_text(path: &[String], value: String, server: &mut ServerInfo, user: Option<&mut UserDraft>) {
    let [.., parent, leaf] = path else {
        return;
    };
    match (parent.as_str(), leaf.as_str()) {
        ("server", "protocol") => server.protocol = Some(value),
        ("server", "host") => server.host = Some(value),
        ("server", "port") => server.port = Some(value),
        ("user", "name") => {
            if let Some(draft) = user {
                draft.name = Some(value);
            }
        }
        ("user", "avatar") => {
            if let Some(draft) = user {
                draft.avatar = Some(value);
            }
        }
        _ => {}
    }
}

/// Parses the users XML export:
///
/// ```xml
/// <intranet>
///   <server><protocol>https</protocol><host>intranet.example.com</host><port>443</port></server>
///   <users>
///     <user id="10"><name>Jan K.</name><avatar>/api/images/users/10</avatar></user>
///   </users>
/// </intranet>
/// ```
///
/// Users lacking an id, a name or an avatar are skipped.
pub fn parse_users_xml(xml: &str, source: &str) -> Result<UserDirectory, PresenceError> {
    let mut reader = Reader::from_str(xml);
    reader.trim_text(true);

    let mut path: Vec<String> = Vec::new();
    let mut server = ServerInfo::default();
    let mut drafts: Vec<UserDraft> = Vec::new();
    let mut current: Option<UserDraft> = None;

    loop {
        match reader.read_event() {
            Ok(Event::Start(tag)) => {
                let name = String::from_utf8_lossy(tag.name().as_ref()).into_owned();
                if name == "user" {
                    let id = tag
                        .try_get_attribute("id")
                        .ok()
                        .flatten()
                        .and_then(|attr| attr.unescape_value().ok()?.trim().parse().ok());
                    current = Some(UserDraft {
                        id,
                        ..Default::default()
                    });
                }
                path.push(name);
            }
            Ok(Event::Text(text)) => {
                let value = text
                    .unescape()
                    .map_err(|e| PresenceError::source_unavailable(source, e))?
                    .into_owned();
                assign_text(&path, value, &mut server, current.as_mut());
            }
            Ok(Event::CData(cdata)) => {
                let value = String::from_utf8(cdata.into_inner().into_owned())
                    .map_err(|e| PresenceError::source_unavailable(source, e))?;
                assign_text(&path, value, &mut server, current.as_mut());
            }
            Ok(Event::End(_)) => {
                if path.pop().as_deref() == Some("user") {
                    drafts.extend(current.take());
                }
            }
            Ok(Event::Eof) => break,
            Err(e) => {
                return Err(PresenceError::source_unavailable(
                    source,
                    format!("XML error at position {}: {}", reader.buffer_position(), e),
                ));
            }
            _ => {}
        }
    }

    let server_url = server
        .url()
        .ok_or_else(|| PresenceError::source_unavailable(source, "missing server block"))?;

    let mut users = BTreeMap::new();
    for (index, draft) in drafts.into_iter().enumerate() {
        match draft {
            UserDraft {
                id: Some(id),
                name: Some(name),
                avatar: Some(avatar),
            } => {
                users.insert(
                    id,
                    UserEntry {
                        name,
                        avatar_url: format!("{server_url}{avatar}"),
                    },
                );
            }
            _ => log::debug!("Problem with user entry {} in {}", index, source),
        }
    }

    Ok(UserDirectory { users })
}

async fn load_directory(path: PathBuf) -> Result<UserDirectory, PresenceError> {
    let source = path.display().to_string();
    let xml = web::block(move || std::fs::read_to_string(&path))
        .await
        .map_err(|e| PresenceError::Internal {
            reason: e.to_string(),
        })?
        .map_err(|e| PresenceError::source_unavailable(&source, e))?;

    let directory = parse_users_xml(&xml, &source)?;
    if directory.is_empty() {
        log::warn!("Users directory {} has no usable entries", source);
    }
    log::info!(
        "Users directory loaded: {} users from {}",
        directory.len(),
        source
    );
    Ok(directory)
}

/// The parsed users XML, re-read from disk once its TTL runs out.
pub struct UserDirectoryCache {
    path: PathBuf,
    cache: Cache<PathBuf, Arc<UserDirectory>>,
}

impl UserDirectoryCache {
    pub fn new(path: impl Into<PathBuf>, ttl: Duration) -> Self {
        Self {
            path: path.into(),
            cache: Cache::builder().max_capacity(1).time_to_live(ttl).build(),
        }
    }

    /// Failed loads are not cached; the next call reads the file again.
    pub async fn get(&self) -> Result<Arc<UserDirectory>, PresenceError> {
        let path = self.path.clone();
        self.cache
            .try_get_with(self.path.clone(), async move {
                load_directory(path).await.map(Arc::new)
            })
            .await
            .map_err(|e| (*e).clone())
    }
}
