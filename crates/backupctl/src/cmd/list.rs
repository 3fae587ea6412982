//! The `list` subcommand.

use std::collections::BTreeMap;
use std::io::Write;
use std::path::PathBuf;
use std::sync::Arc;

use clap::{Args, ValueEnum};
use kube::{api::DynamicObject, ResourceExt};
use prettytable::{format::consts::FORMAT_CLEAN, Cell, Row, Table};
use serde::Serialize;
use tracing::{debug, warn};

use crate::{
    cmd::GlobalArgs,
    config::{Config, FetchErrorPolicy},
    document::Document,
    kubernetes::{ClusterSource, Factory, ResourceQuery, BACKUP_JOB_RESOURCE},
    ErrorList, Result,
};

const HEADERS: [&str; 5] = ["NAMESPACE", "NAME", "PHASE", "COMPLETION_TIME", "CREATE_TIME"];

#[derive(Debug, Clone, Default, Args)]
pub struct ListArgs {
    /// Names of the backup jobs to list; all of them when omitted
    pub names: Vec<String>,

    /// Manifest file naming the backup jobs to list (repeatable)
    #[arg(short = 'f', long = "filename")]
    pub filenames: Vec<PathBuf>,

    /// Objects requested per list call, 0 to disable chunking
    #[arg(long)]
    pub chunk_size: Option<u32>,

    /// Stop at the first backup job that cannot be fetched
    #[arg(long)]
    pub fail_fast: bool,

    /// Add a LABELS column to the table
    #[arg(long)]
    pub show_labels: bool,

    /// Output format
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Table)]
    pub output: OutputFormat,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Table,
    Json,
    Yaml,
}

/// One row of output.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BackupJobInfo {
    pub namespace: String,
    pub name: String,
    pub phase: String,
    pub completion_time: String,
    pub start_time: String,
    /// `"key:value "` for every label, ordered by key
    pub labels: String,
}

/// Output and diagnostic streams of one invocation.
pub struct IoStreams<'a> {
    pub out: &'a mut dyn Write,
    pub err_out: &'a mut dyn Write,
}

impl<'a> IoStreams<'a> {
    pub fn new(out: &'a mut dyn Write, err_out: &'a mut dyn Write) -> Self {
        Self { out, err_out }
    }
}

pub struct ListOptions {
    pub namespace: String,
    pub all_namespaces: bool,
    pub enforce_namespace: bool,
    /// Resource type followed by object names
    pub builder_args: Vec<String>,
    pub filenames: Vec<PathBuf>,
    pub chunk_size: u32,
    pub fetch_policy: FetchErrorPolicy,
    pub output: OutputFormat,
    pub show_labels: bool,
    source: Arc<dyn ClusterSource>,
}

impl ListOptions {
    pub fn complete(
        factory: &dyn Factory,
        global: &GlobalArgs,
        args: &ListArgs,
        config: &Config,
    ) -> Result<Self> {
        let (namespace, mut enforce_namespace) = factory.namespace()?;
        if global.all_namespaces {
            enforce_namespace = false;
        }

        let mut builder_args = Vec::with_capacity(args.names.len() + 1);
        builder_args.push(BACKUP_JOB_RESOURCE.to_string());
        builder_args.extend(args.names.iter().cloned());

        let source = factory.cluster_source()?;

        Ok(Self {
            namespace,
            all_namespaces: global.all_namespaces,
            enforce_namespace,
            builder_args,
            filenames: args.filenames.clone(),
            chunk_size: args.chunk_size.unwrap_or(config.list.chunk_size),
            fetch_policy: if args.fail_fast {
                FetchErrorPolicy::FailFast
            } else {
                config.list.fetch_policy
            },
            output: args.output,
            show_labels: args.show_labels,
            source,
        })
    }

    fn query(&self) -> Result<ResourceQuery> {
        let (resource_type, names) = ResourceQuery::split_builder_args(&self.builder_args)?;
        Ok(ResourceQuery {
            resource_type,
            names,
            filenames: self.filenames.clone(),
            namespace: self.namespace.clone(),
            all_namespaces: self.all_namespaces,
            enforce_namespace: self.enforce_namespace,
            chunk_size: self.chunk_size,
        })
    }

    pub async fn run(&self, streams: &mut IoStreams<'_>) -> Result<()> {
        let query = self.query()?;
        let infos = self.source.resolve(&query).await?;
        debug!(count = infos.len(), "resolved backup jobs");

        let mut errors = ErrorList::new();
        let mut rows = Vec::with_capacity(infos.len());
        for info in &infos {
            let mapping = match info.resource_mapping() {
                Ok(mapping) => mapping,
                Err(err) => {
                    warn!(namespace = %info.namespace, name = %info.name, "skipping: {}", err);
                    errors.push(err);
                    continue;
                }
            };

            let obj = match self.source.fetch(&mapping, &info.namespace, &info.name).await {
                Ok(obj) => obj,
                Err(err) if self.fetch_policy == FetchErrorPolicy::FailFast => return Err(err),
                Err(err) => {
                    warn!(namespace = %info.namespace, name = %info.name, "skipping: {}", err);
                    errors.push(err);
                    continue;
                }
            };

            rows.push(build_backup_job_info(&obj));
        }

        self.render(&rows, &mut *streams.out)?;

        if infos.is_empty() && errors.is_empty() {
            // if we wrote no output, and had no errors, be sure we output something.
            if self.all_namespaces {
                writeln!(streams.err_out, "No resources found")?;
            } else {
                writeln!(streams.err_out, "No resources found in {} namespace.", self.namespace)?;
            }
        }

        errors.into_result()
    }

    fn render(&self, rows: &[BackupJobInfo], out: &mut dyn Write) -> Result<()> {
        match self.output {
            OutputFormat::Table => {
                backup_job_table(rows, self.show_labels).print(out)?;
            }
            OutputFormat::Json => {
                serde_json::to_writer_pretty(&mut *out, rows)?;
                writeln!(out)?;
            }
            OutputFormat::Yaml => serde_yaml::to_writer(&mut *out, rows)?,
        }
        Ok(())
    }
}

fn backup_job_table(rows: &[BackupJobInfo], show_labels: bool) -> Table {
    let mut table = Table::new();
    table.set_format(*FORMAT_CLEAN);

    let mut header: Vec<Cell> = HEADERS.iter().map(|h| Cell::new(h)).collect();
    if show_labels {
        header.push(Cell::new("LABELS"));
    }
    table.add_row(Row::new(header));

    for info in rows {
        let mut cells = vec![
            Cell::new(&info.namespace),
            Cell::new(&info.name),
            Cell::new(&info.phase),
            Cell::new(&info.completion_time),
            Cell::new(&info.start_time),
        ];
        if show_labels {
            cells.push(Cell::new(info.labels.trim_end()));
        }
        table.add_row(Row::new(cells));
    }

    table
}

/// Project the displayed fields out of a fetched backup job. Missing or
/// non-string status fields are left empty.
pub fn build_backup_job_info(obj: &DynamicObject) -> BackupJobInfo {
    let mut info = BackupJobInfo {
        namespace: obj.namespace().unwrap_or_default(),
        name: obj.name_any(),
        labels: join_labels(obj.labels()),
        ..Default::default()
    };

    let data = Document::new(&obj.data);
    let status = match data.field("status") {
        Some(status) if status.is_mapping() => status,
        Some(_) => {
            debug!(name = %info.name, "status is not a mapping, ignoring it");
            return info;
        }
        None => return info,
    };

    let read = |key: &str| status.str_field(key).unwrap_or_default().to_string();
    info.phase = read("phase");
    info.completion_time = read("completionTimestamp");
    info.start_time = read("startTimestamp");
    info
}

fn join_labels(labels: &BTreeMap<String, String>) -> String {
    labels.iter().map(|(k, v)| format!("{}:{} ", k, v)).collect()
}
