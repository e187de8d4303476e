//! Flatten aggregated results into rows and drive an [`OutputWriter`].
//!
//! Agents are exported in batches so the row buffers stay bounded on large
//! populations; link rows are written once at the end.

use hx_exposure::LinkExposureStore;
use hx_spatial::ThermalIndex;
use hx_trajectory::{Agent, Population};

use crate::writer::OutputWriter;
use crate::{ActivityRow, AgentRow, EventRow, LegRow, LinkRow, OutputResult};

/// Agents per write batch.
pub const DEFAULT_BATCH: usize = 10_000;

/// Rows written by one [`export`] call.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct ExportCounts {
    pub agents:     usize,
    pub activities: usize,
    pub legs:       usize,
    pub events:     usize,
    pub links:      usize,
}

/// Row buffers for a batch of agents.
#[derive(Debug, Default)]
pub struct RowBatch {
    pub agents:     Vec<AgentRow>,
    pub activities: Vec<ActivityRow>,
    pub legs:       Vec<LegRow>,
    pub events:     Vec<EventRow>,
    next_activity:  u64,
    next_leg:       u64,
}

impl RowBatch {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append all rows of `agent`.
    pub fn push_agent(&mut self, agent: &Agent, index: &ThermalIndex) {
        self.agents.push(AgentRow {
            agent_id: agent.name.clone(),
            segments: agent.segment_count() as u32,
            aborted:  agent.aborted,
            air:      agent.air,
            radiant:  agent.radiant,
        });

        for (i, act) in agent.activities.iter().enumerate() {
            self.activities.push(ActivityRow {
                activity_id: self.next_activity,
                agent_id:    agent.name.clone(),
                index:       i as u32,
                act_type:    act.act_type.clone(),
                parcel_id:   index.parcels().get(act.parcel).name.clone(),
                start:       act.start,
                end:         act.end,
                duration:    act.duration(),
                air:         act.air,
            });
            self.next_activity += 1;
        }

        for (i, leg) in agent.legs.iter().enumerate() {
            self.legs.push(LegRow {
                leg_id:   self.next_leg,
                agent_id: agent.name.clone(),
                index:    i as u32,
                mode:     leg.mode_tag.clone(),
                start:    leg.start,
                end:      leg.end,
                duration: leg.duration(),
                air:      leg.air,
                radiant:  leg.radiant,
            });
            self.next_leg += 1;

            for ev in &leg.events {
                self.events.push(EventRow {
                    agent_id:  agent.name.clone(),
                    leg_index: i as u32,
                    link_id:   index.network().link(ev.link).name.clone(),
                    entry:     ev.entry,
                    exit:      ev.exit,
                    air:       ev.air,
                    radiant:   ev.radiant,
                });
            }
        }
    }

    /// Write and clear the buffers.  Sequence numbers keep counting.
    pub fn flush<W: OutputWriter>(&mut self, writer: &mut W, counts: &mut ExportCounts) -> OutputResult<()> {
        writer.write_agents(&self.agents)?;
        writer.write_activities(&self.activities)?;
        writer.write_legs(&self.legs)?;
        writer.write_events(&self.events)?;
        counts.agents += self.agents.len();
        counts.activities += self.activities.len();
        counts.legs += self.legs.len();
        counts.events += self.events.len();
        self.agents.clear();
        self.activities.clear();
        self.legs.clear();
        self.events.clear();
        Ok(())
    }
}

/// One row per network link, in link id order.
pub fn link_rows(index: &ThermalIndex, links: &LinkExposureStore) -> Vec<LinkRow> {
    links
        .iter()
        .map(|(id, t)| LinkRow {
            link_id:    index.network().link(id).name.clone(),
            traversals: t.traversals,
            air:        t.air,
            radiant:    t.radiant,
        })
        .collect()
}

/// Write every agent of `pop` and every link, then finish `writer`.
pub fn export<W: OutputWriter>(
    writer: &mut W,
    pop:    &Population,
    index:  &ThermalIndex,
    links:  &LinkExposureStore,
    batch:  usize,
) -> OutputResult<ExportCounts> {
    let mut counts = ExportCounts::default();
    let mut rows = RowBatch::new();

    for chunk in pop.agents().chunks(batch.max(1)) {
        for agent in chunk {
            rows.push_agent(agent, index);
        }
        rows.flush(writer, &mut counts)?;
    }

    let link_rows = link_rows(index, links);
    writer.write_links(&link_rows)?;
    counts.links = link_rows.len();
    writer.finish()?;

    tracing::info!(
        agents = counts.agents,
        activities = counts.activities,
        legs = counts.legs,
        events = counts.events,
        links = counts.links,
        "results written"
    );
    Ok(counts)
}
