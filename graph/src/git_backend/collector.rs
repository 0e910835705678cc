use std::io::Write;

use gitvtree_core::{HistorySource, RunLog, StatusSink};
use tracing::{debug, info, warn};

use crate::core::{Chain, ChainOrigin};
use crate::error::Result;
use crate::parse::{parse_hash_list, parse_merge_log, parse_ref_list, Section};

pub(crate) const EMPTY_BLOCK: &str = "Unable to get branch or branch empty ...";
const EMPTY_CHAIN: &str = "Unable to get commit(s) ...";

/// Builds the raw, pre-reduction chain set: one chain per non-tag ref, then
/// one per (merge commit, merged-in parent) pair, in discovery order
pub struct ChainCollector<'a, H: ?Sized> {
    history: &'a H,
}

impl<'a, H: HistorySource + ?Sized> ChainCollector<'a, H> {
    pub fn new(history: &'a H) -> Self {
        Self { history }
    }

    pub fn collect<W: Write>(
        &self,
        log: &mut RunLog<W>,
        status: &mut dyn StatusSink,
    ) -> Result<Vec<Chain>> {
        let mut chains = self.ref_chains(log, status)?;
        chains.extend(self.merge_chains(log, status)?);
        Ok(chains)
    }

    /// First-parent history of every branch-like ref
    pub fn ref_chains<W: Write>(
        &self,
        log: &mut RunLog<W>,
        status: &mut dyn StatusSink,
    ) -> Result<Vec<Chain>> {
        status.report("Getting git ref branch(es) ...");
        let raw = self.history.refs();
        if raw.trim().is_empty() {
            warn!("ref enumeration returned nothing");
            status.report(EMPTY_BLOCK);
            return Ok(Vec::new());
        }
        log.append_section(Section::Refs.label(), &raw)?;

        let mut chains = Vec::new();
        for entry in parse_ref_list(&raw)? {
            if entry.is_tag() {
                debug!(name = %entry.name, "skipping tag ref");
                continue;
            }

            let commits = parse_hash_list(&self.history.first_parent_chain(&entry.hash));
            if commits.is_empty() {
                info!(name = %entry.name, hash = %entry.hash, "no first-parent history since cutoff");
                status.report(EMPTY_CHAIN);
                continue;
            }

            debug!(name = %entry.name, len = commits.len(), "ref chain");
            chains.push(Chain::new(ChainOrigin::Ref { name: entry.name }, commits));
        }
        Ok(chains)
    }

    /// First-parent history of every merged-in parent, capped by its merge
    pub fn merge_chains<W: Write>(
        &self,
        log: &mut RunLog<W>,
        status: &mut dyn StatusSink,
    ) -> Result<Vec<Chain>> {
        status.report("Getting git merged branch(es) ...");
        let raw = self.history.merges();
        if raw.trim().is_empty() {
            info!("no merge commits since cutoff");
            status.report(EMPTY_BLOCK);
            return Ok(Vec::new());
        }
        log.append_section(Section::Merges.label(), &raw)?;

        let mut chains = Vec::new();
        for merge in parse_merge_log(&raw)? {
            for parent in merge.merged_parents() {
                let mut commits = parse_hash_list(&self.history.first_parent_chain(parent));
                if commits.is_empty() {
                    info!(merge = %merge.hash, %parent, "no first-parent history since cutoff");
                    status.report(EMPTY_CHAIN);
                    continue;
                }

                commits.push(merge.hash.clone());
                debug!(merge = %merge.hash, %parent, len = commits.len(), "merge chain");
                chains.push(Chain::new(
                    ChainOrigin::Merge {
                        merge: merge.hash.clone(),
                        parent: parent.clone(),
                    },
                    commits,
                ));
            }
        }
        Ok(chains)
    }
}
