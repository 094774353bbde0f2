//! Text dashboard for a sync-validation report.
//!
//! One block per probe group: a summary line, then every section with its
//! verdict. Zombies are listed again at the end so they are easy to act on.

use sitecontent_core::{ClassificationReport, ProbeGroup, SectionStatus, Verdict, VerdictCounts};

const NAME_WIDTH: usize = 32;

// ── Public API ──

/// Print the full dashboard.
pub fn print_report(report: &ClassificationReport) {
    println!("=== Content sync validation ===");
    println!("{}", summary_line(&report.overall));
    println!();

    for group in ProbeGroup::ALL {
        print_group(report, group);
    }

    let zombies: Vec<&SectionStatus> = report.zombies().collect();
    if zombies.is_empty() {
        println!("No zombie sections.");
        return;
    }
    println!("Zombie sections ({})", zombies.len());
    for status in zombies {
        match &status.error {
            Some(error) => println!("  {:<NAME_WIDTH$} {error}", status.name),
            None => println!("  {:<NAME_WIDTH$} no authored data", status.name),
        }
    }
}

// ── Group rendering ──

fn print_group(report: &ClassificationReport, group: ProbeGroup) {
    let counts = report.group(group);
    if counts.total == 0 {
        return;
    }

    println!("{} ({})", group.as_str(), summary_line(&counts));
    for status in report.in_group(group) {
        println!("{}", section_line(status));
    }
    println!();
}

fn summary_line(counts: &VerdictCounts) -> String {
    format!(
        "{} sections: {} dynamic, {} zombie, {} loading, {} errored, {:.0}% healthy",
        counts.total,
        counts.dynamic,
        counts.zombie,
        counts.loading,
        counts.errored,
        counts.health_percentage(),
    )
}

fn section_line(status: &SectionStatus) -> String {
    let marker = match status.verdict {
        Verdict::Dynamic => "ok",
        Verdict::Zombie if status.error.is_some() => "ERR",
        Verdict::Zombie => "ZOMBIE",
        Verdict::Loading => "...",
    };
    format!("  {:<NAME_WIDTH$} {marker}", status.name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use sitecontent_core::{SectionProbe, classify};

    #[test]
    fn section_markers() {
        let report = classify(&[
            SectionProbe::new("stats", ProbeGroup::DataHooks, false, true),
            SectionProbe::new("courses", ProbeGroup::DataHooks, false, false),
            SectionProbe::new("faculty", ProbeGroup::DataHooks, true, false),
        ]);
        let lines: Vec<String> = report.sections.iter().map(section_line).collect();
        assert!(lines[0].ends_with(" ok"));
        assert!(lines[1].ends_with(" ZOMBIE"));
        assert!(lines[2].ends_with(" ..."));
    }

    #[test]
    fn summary_counts() {
        let counts = VerdictCounts {
            total: 4,
            dynamic: 3,
            zombie: 1,
            loading: 0,
            errored: 0,
        };
        assert_eq!(
            summary_line(&counts),
            "4 sections: 3 dynamic, 1 zombie, 0 loading, 0 errored, 75% healthy"
        );
    }
}
