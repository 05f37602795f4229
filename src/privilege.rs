//! chroot and user/group switch, run once after the listening socket is bound.

use std::ffi::CString;
use std::io;
use std::path::Path;

use anyhow::{Context, bail};

use crate::config::Privileges;

/// Confines the process to `root` and switches to the configured account.
///
/// Account names are looked up before entering the jail, since the password
/// and group databases usually live outside it. After this returns, paths
/// must be given relative to the new root.
pub fn enter_jail(root: &Path, privileges: &Privileges) -> anyhow::Result<()> {
    let gid = lookup_group(&privileges.group)?;
    let uid = lookup_user(&privileges.user)?;
    let user = CString::new(privileges.user.as_str()).context("user name contains NUL")?;

    std::os::unix::fs::chroot(root)
        .with_context(|| format!("chroot({}) failed", root.display()))?;
    std::env::set_current_dir("/").context("chdir(/) failed")?;

    if unsafe { libc::setgid(gid) } < 0 {
        return Err(io::Error::last_os_error()).with_context(|| format!("setgid({gid}) failed"));
    }
    if unsafe { libc::initgroups(user.as_ptr(), gid as _) } < 0 {
        return Err(io::Error::last_os_error())
            .with_context(|| format!("initgroups({}) failed", privileges.user));
    }
    if unsafe { libc::setuid(uid) } < 0 {
        return Err(io::Error::last_os_error()).with_context(|| format!("setuid({uid}) failed"));
    }

    tracing::info!(
        root = %root.display(),
        user = %privileges.user,
        group = %privileges.group,
        "Entered chroot"
    );
    Ok(())
}

fn lookup_user(name: &str) -> anyhow::Result<libc::uid_t> {
    let c_name = CString::new(name).context("user name contains NUL")?;
    let entry = unsafe { libc::getpwnam(c_name.as_ptr()) };
    if entry.is_null() {
        bail!("no such user: {name}");
    }
    Ok(unsafe { (*entry).pw_uid })
}

fn lookup_group(name: &str) -> anyhow::Result<libc::gid_t> {
    let c_name = CString::new(name).context("group name contains NUL")?;
    let entry = unsafe { libc::getgrnam(c_name.as_ptr()) };
    if entry.is_null() {
        bail!("no such group: {name}");
    }
    Ok(unsafe { (*entry).gr_gid })
}
