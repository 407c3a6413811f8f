//! Mirror clone and mirror push with git2
use std::{collections::HashSet, fs::remove_dir_all, path::Path};

use git2::{
    build::RepoBuilder, AutotagOption, Cred, FetchOptions, PushOptions, RemoteCallbacks,
    Repository,
};
use log::{debug, info};

use crate::errors::{GitRelocateError, GitRelocateErrorKind};

/// Refspec fetching every ref as is
const MIRROR_REFSPEC: &str = "+refs/*:refs/*";

/// Refs the destination manages itself and refuses to delete
const HIDDEN_REF_PREFIXES: [&str; 1] = ["refs/pull/"];

/// Where the destination refs are fetched to compare them with the local ones
const DESTINATION_NAMESPACE: &str = "refs/relocate-destination/";

/// Symbolic ref `RepoBuilder` leaves behind, absent from a mirror
const ORIGIN_HEAD: &str = "refs/remotes/origin/HEAD";

/// Callbacks authenticating with the ssh-agent
fn ssh_callbacks<'a>() -> RemoteCallbacks<'a> {
    let mut callbacks = RemoteCallbacks::new();
    callbacks.credentials(|_url, username_from_url, _allowed| {
        Cred::ssh_key_from_agent(username_from_url.unwrap_or("git"))
    });
    callbacks
}

/// Remove the local mirror, if any
pub(crate) fn remove_mirror(path: &Path) -> Result<(), GitRelocateError> {
    if path.exists() {
        debug!("removing {}", path.display());
        remove_dir_all(path)?;
    }
    Ok(())
}

/// Clone every ref of `url` into a bare repository at `path`
///
/// Whatever was at `path` before is removed.
pub(crate) fn mirror_clone(url: &str, path: &Path) -> Result<Repository, GitRelocateError> {
    remove_mirror(path)?;
    let mut fetch_opts = FetchOptions::new();
    fetch_opts.remote_callbacks(ssh_callbacks());
    let mut builder = RepoBuilder::new();
    builder
        .bare(true)
        .remote_create(|repo, name, url| repo.remote_with_fetch(name, url, MIRROR_REFSPEC))
        .fetch_options(fetch_opts);
    info!("cloning '{}' to '{}'", url, path.display());
    let repo = builder.clone(url, path)?;
    repo.config()?.set_bool("remote.origin.mirror", true)?;
    if let Ok(mut origin_head) = repo.find_reference(ORIGIN_HEAD) {
        origin_head.delete()?;
    }
    Ok(repo)
}

/// Refspecs making the remote refs equal to the local ones
///
/// Local refs are force-pushed, remote refs missing locally are deleted.
fn mirror_refspecs(local: &[String], remote: &[String]) -> Vec<String> {
    let local_set: HashSet<&str> = local.iter().map(String::as_str).collect();
    let updates = local.iter().map(|name| format!("+{name}:{name}"));
    let deletions = remote
        .iter()
        .filter(|name| name.starts_with("refs/") && !local_set.contains(name.as_str()))
        .filter(|name| !HIDDEN_REF_PREFIXES.iter().any(|p| name.starts_with(p)))
        .map(|name| format!(":{name}"));
    updates.chain(deletions).collect()
}

/// Names of the refs the destination has
///
/// `Remote::list` can't be used when the destination advertises no refs, so
/// they are fetched into a separate namespace, read, then removed. The fetch
/// goes through an anonymous remote so no `refs/remotes/` ref is updated.
fn destination_refs(repo: &Repository, url: &str) -> Result<Vec<String>, GitRelocateError> {
    let mut remote = repo.remote_anonymous(url)?;
    let mut fetch_opts = FetchOptions::new();
    fetch_opts
        .remote_callbacks(ssh_callbacks())
        .download_tags(AutotagOption::None);
    let refspec = format!("+refs/*:{DESTINATION_NAMESPACE}*");
    remote.fetch(&[refspec.as_str()], Some(&mut fetch_opts), None)?;

    let mut fetched = vec![];
    for reference in repo.references_glob(&format!("{DESTINATION_NAMESPACE}*"))? {
        if let Some(name) = reference?.name() {
            fetched.push(name.to_string());
        }
    }
    let mut names = Vec::with_capacity(fetched.len());
    for name in fetched {
        repo.find_reference(&name)?.delete()?;
        if let Some(rest) = name.strip_prefix(DESTINATION_NAMESPACE) {
            names.push(format!("refs/{rest}"));
        }
    }
    Ok(names)
}

/// Push every ref to the destination at `url`
///
/// With `prune`, refs only the destination has are deleted. A freshly created
/// destination has nothing to delete. Pushing through an anonymous remote
/// leaves no `refs/remotes/` ref in the mirror.
pub(crate) fn push_mirror(
    repo: &Repository,
    url: &str,
    prune: bool,
) -> Result<(), GitRelocateError> {
    let mut local_refs = vec![];
    for reference in repo.references()? {
        let reference = reference?;
        if reference.kind() != Some(git2::ReferenceType::Direct) {
            continue;
        }
        if let Some(name) = reference.name() {
            local_refs.push(name.to_string());
        }
    }

    let remote_refs = if prune {
        destination_refs(repo, url)?
    } else {
        vec![]
    };
    debug!("{url} has {} refs", remote_refs.len());

    let refspecs = mirror_refspecs(&local_refs, &remote_refs);
    if refspecs.is_empty() {
        info!("nothing to push to {url}");
        return Ok(());
    }
    debug!("pushing {} refspecs to {url}", refspecs.len());

    let mut remote = repo.remote_anonymous(url)?;

    let mut rejected = vec![];
    {
        let mut callbacks = ssh_callbacks();
        callbacks.push_update_reference(|refname, status| {
            if let Some(message) = status {
                rejected.push(format!("{refname}: {message}"));
            }
            Ok(())
        });
        let mut opts = PushOptions::new();
        opts.remote_callbacks(callbacks);
        remote.push(&refspecs, Some(&mut opts))?;
    }
    if !rejected.is_empty() {
        return Err(GitRelocateError::new(GitRelocateErrorKind::Push)
            .with_text(&format!("rejected by {url}: {}", rejected.join(", "))));
    }
    Ok(())
}

#[cfg(test)]
mod test {
    use super::*;
    use git2::{Oid, Signature};
    use tempfile::TempDir;

    /// Commit an empty tree on `refname`
    fn commit_on(repo: &Repository, refname: &str) -> Oid {
        let sig = Signature::now("test", "test@example.com").unwrap();
        let tree_id = repo.treebuilder(None).unwrap().write().unwrap();
        let tree = repo.find_tree(tree_id).unwrap();
        repo.commit(Some(refname), &sig, &sig, "init", &tree, &[]).unwrap()
    }

    /// Bare repository with one commit on `main`, a `dev` branch and a `v1` tag
    fn source_repo(dir: &Path) -> (Repository, Oid) {
        let repo = Repository::init_bare(dir).unwrap();
        let oid = commit_on(&repo, "refs/heads/main");
        repo.reference("refs/heads/dev", oid, false, "dev").unwrap();
        repo.reference("refs/tags/v1", oid, false, "v1").unwrap();
        repo.set_head("refs/heads/main").unwrap();
        (repo, oid)
    }

    fn ref_names(repo: &Repository) -> Vec<String> {
        let mut names: Vec<String> = repo
            .references()
            .unwrap()
            .map(|r| r.unwrap().name().unwrap().to_string())
            .collect();
        names.sort();
        names
    }

    #[test]
    fn refspecs_update_and_delete() {
        let local = vec!["refs/heads/main".to_string(), "refs/tags/v1".to_string()];
        let remote = vec![
            "HEAD".to_string(),
            "refs/heads/main".to_string(),
            "refs/heads/stale".to_string(),
            "refs/pull/1/head".to_string(),
        ];
        assert_eq!(
            mirror_refspecs(&local, &remote),
            vec![
                "+refs/heads/main:refs/heads/main".to_string(),
                "+refs/tags/v1:refs/tags/v1".to_string(),
                ":refs/heads/stale".to_string(),
            ]
        );
    }

    #[test]
    fn refspecs_for_empty_destination() {
        let local = vec!["refs/heads/main".to_string()];
        assert_eq!(
            mirror_refspecs(&local, &[]),
            vec!["+refs/heads/main:refs/heads/main".to_string()]
        );
        assert!(mirror_refspecs(&[], &[]).is_empty());
    }

    #[test]
    fn clone_and_push_mirror() {
        let tmp = TempDir::new().unwrap();
        let source_dir = tmp.path().join("source.git");
        let (_source, oid) = source_repo(&source_dir);

        let destination_dir = tmp.path().join("destination.git");
        let destination = Repository::init_bare(&destination_dir).unwrap();
        commit_on(&destination, "refs/heads/stale");

        let mirror_dir = tmp.path().join("widgets");
        std::fs::create_dir_all(mirror_dir.join("leftover")).unwrap();
        let mirror = mirror_clone(source_dir.to_str().unwrap(), &mirror_dir).unwrap();
        assert!(mirror.is_bare());
        assert!(!mirror_dir.join("leftover").exists());
        assert!(mirror
            .config()
            .unwrap()
            .get_bool("remote.origin.mirror")
            .unwrap());
        assert_eq!(
            ref_names(&mirror),
            vec!["refs/heads/dev", "refs/heads/main", "refs/tags/v1"]
        );

        push_mirror(&mirror, destination_dir.to_str().unwrap(), true).unwrap();
        assert_eq!(
            ref_names(&destination),
            vec!["refs/heads/dev", "refs/heads/main", "refs/tags/v1"]
        );
        assert_eq!(destination.refname_to_id("refs/heads/main").unwrap(), oid);
        assert_eq!(
            ref_names(&mirror),
            vec!["refs/heads/dev", "refs/heads/main", "refs/tags/v1"]
        );

        // pushing again changes nothing
        push_mirror(&mirror, destination_dir.to_str().unwrap(), true).unwrap();
        assert_eq!(
            ref_names(&destination),
            vec!["refs/heads/dev", "refs/heads/main", "refs/tags/v1"]
        );
        drop(mirror);
        remove_mirror(&mirror_dir).unwrap();
        assert!(!mirror_dir.exists());
        remove_mirror(&mirror_dir).unwrap();
    }

    #[test]
    fn push_into_empty_destination() {
        let tmp = TempDir::new().unwrap();
        let source_dir = tmp.path().join("source.git");
        let (_source, oid) = source_repo(&source_dir);
        let mirror_dir = tmp.path().join("widgets");
        let mirror = mirror_clone(source_dir.to_str().unwrap(), &mirror_dir).unwrap();

        for (name, prune) in [("created.git", false), ("found-empty.git", true)] {
            let destination_dir = tmp.path().join(name);
            let destination = Repository::init_bare(&destination_dir).unwrap();
            push_mirror(&mirror, destination_dir.to_str().unwrap(), prune).unwrap();
            assert_eq!(
                ref_names(&destination),
                vec!["refs/heads/dev", "refs/heads/main", "refs/tags/v1"],
                "{name}"
            );
            assert_eq!(destination.refname_to_id("refs/heads/dev").unwrap(), oid);
        }
    }

    #[test]
    fn push_without_prune_keeps_extra_refs() {
        let tmp = TempDir::new().unwrap();
        let source_dir = tmp.path().join("source.git");
        source_repo(&source_dir);
        let destination_dir = tmp.path().join("destination.git");
        let destination = Repository::init_bare(&destination_dir).unwrap();
        commit_on(&destination, "refs/heads/stale");

        let mirror_dir = tmp.path().join("widgets");
        let mirror = mirror_clone(source_dir.to_str().unwrap(), &mirror_dir).unwrap();
        push_mirror(&mirror, destination_dir.to_str().unwrap(), false).unwrap();
        assert_eq!(
            ref_names(&destination),
            vec!["refs/heads/dev", "refs/heads/main", "refs/heads/stale", "refs/tags/v1"]
        );
    }

    #[test]
    fn mirror_clone_has_no_remote_tracking_refs() {
        let tmp = TempDir::new().unwrap();
        let source_dir = tmp.path().join("source.git");
        source_repo(&source_dir);
        let mirror_dir = tmp.path().join("widgets");
        let mirror = mirror_clone(source_dir.to_str().unwrap(), &mirror_dir).unwrap();
        assert!(mirror.find_reference(ORIGIN_HEAD).is_err());
        assert_eq!(mirror.head().unwrap().name(), Some("refs/heads/main"));
    }
}
