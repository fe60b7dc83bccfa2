use std::fs;

use crate::paths::resolve_link_text;
use crate::resolver::DotfileMapping;

#[derive(Debug, Default)]
pub struct LinkStatus {
    pub linked: usize,
    pub external: usize,
    pub missing: usize,
    pub conflict: usize,
}

#[derive(Debug, PartialEq, Eq)]
pub enum ItemStatus {
    Linked,
    External(String),
    Missing,
    Conflict,
}

impl LinkStatus {
    pub fn record(&mut self, status: &ItemStatus) {
        match status {
            ItemStatus::Linked => self.linked += 1,
            ItemStatus::External(_) => self.external += 1,
            ItemStatus::Missing => self.missing += 1,
            ItemStatus::Conflict => self.conflict += 1,
        }
    }

    pub fn total(&self) -> usize {
        self.linked + self.external + self.missing + self.conflict
    }
}

pub fn check_mapping_status(mapping: &DotfileMapping) -> ItemStatus {
    if !mapping.target_exists {
        return ItemStatus::Missing;
    }

    if !mapping.target_is_symlink {
        return ItemStatus::Conflict;
    }

    if !mapping.needs_link {
        return ItemStatus::Linked;
    }

    match fs::read_link(&mapping.target_absolute) {
        Ok(text) => ItemStatus::External(
            resolve_link_text(&mapping.target_absolute, &text)
                .to_string_lossy()
                .to_string(),
        ),
        Err(_) => ItemStatus::Conflict,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resolver::discover;
    use std::os::unix::fs::symlink;
    use tempfile::TempDir;

    #[test]
    fn test_status_of_each_kind() {
        let temp = TempDir::new().unwrap();
        let repo = temp.path().join("repo");
        let home = temp.path().join("home");
        fs::create_dir_all(&repo).unwrap();
        fs::create_dir_all(&home).unwrap();
        for name in [".a", ".b", ".c", ".d"] {
            fs::write(repo.join(name), name).unwrap();
        }
        symlink(repo.join(".a"), home.join(".a")).unwrap();
        symlink("/etc/hosts", home.join(".b")).unwrap();
        fs::write(home.join(".c"), "local").unwrap();

        let mappings = discover(&repo, &home).unwrap();
        let statuses: Vec<ItemStatus> = mappings.iter().map(check_mapping_status).collect();

        assert_eq!(statuses[0], ItemStatus::Linked);
        assert_eq!(statuses[1], ItemStatus::External("/etc/hosts".to_string()));
        assert_eq!(statuses[2], ItemStatus::Conflict);
        assert_eq!(statuses[3], ItemStatus::Missing);

        let mut totals = LinkStatus::default();
        statuses.iter().for_each(|s| totals.record(s));
        assert_eq!(totals.total(), 4);
        assert_eq!(totals.linked, 1);
    }
}
