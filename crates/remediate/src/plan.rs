//! Upgrade command sequences per package manager

use crate::runner::Step;

/// Debian: refresh metadata, then upgrade the named packages (or
/// everything when no names are given)
pub(crate) fn debian_steps(names: &[String]) -> Vec<Step> {
    let upgrade = if names.is_empty() {
        Step::new("apt-get", ["-y", "upgrade"])
    } else {
        let mut args = vec!["-y", "install", "--only-upgrade"];
        args.extend(names.iter().map(String::as_str));
        Step::new("apt-get", args)
    };

    vec![Step::new("apt-get", ["update"]), upgrade]
}

/// RPM family: one combined update command with optional names
pub(crate) fn redhat_steps(names: &[String]) -> Vec<Step> {
    let mut args = vec!["-y", "update"];
    args.extend(names.iter().map(String::as_str));
    vec![Step::new("yum", args)]
}

/// Language index: self-upgrade pip, then upgrade the named packages
pub(crate) fn lang_steps(names: &[String]) -> Vec<Step> {
    let mut steps = vec![Step::new(
        "python3",
        ["-m", "pip", "install", "--upgrade", "pip"],
    )];

    if !names.is_empty() {
        let mut args = vec!["-m", "pip", "install", "--upgrade"];
        args.extend(names.iter().map(String::as_str));
        steps.push(Step::new("python3", args));
    }

    steps
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn debian_scoped_upgrade_names_only_listed_packages() {
        let steps = debian_steps(&["openssl".to_string(), "zlib1g".to_string()]);
        assert_eq!(steps.len(), 2);
        assert_eq!(steps[0].command_line(), "apt-get update");
        assert_eq!(
            steps[1].command_line(),
            "apt-get -y install --only-upgrade openssl zlib1g"
        );
    }

    #[test]
    fn debian_without_names_upgrades_everything() {
        let steps = debian_steps(&[]);
        assert_eq!(steps[1].command_line(), "apt-get -y upgrade");
    }

    #[test]
    fn redhat_is_one_combined_command() {
        let steps = redhat_steps(&["openssl".to_string()]);
        assert_eq!(steps.len(), 1);
        assert_eq!(steps[0].command_line(), "yum -y update openssl");
    }

    #[test]
    fn lang_self_upgrade_comes_first() {
        let steps = lang_steps(&["requests".to_string()]);
        assert_eq!(steps.len(), 2);
        assert_eq!(
            steps[0].command_line(),
            "python3 -m pip install --upgrade pip"
        );
        assert_eq!(
            steps[1].command_line(),
            "python3 -m pip install --upgrade requests"
        );
    }

    #[test]
    fn lang_without_names_only_self_upgrades() {
        assert_eq!(lang_steps(&[]).len(), 1);
    }
}
