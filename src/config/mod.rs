//! Configuration of a piclo run.
//!
//! The configuration document is JSON; it is deserialized with serde
//! and then validated as a whole, so that every fault is reported in
//! one pass. The `requirements` expression is compiled into its AST
//! here, at validation time.

use std::collections::BTreeMap;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::metrics::Metric;
use crate::models::DEFAULT_INTRON_RANGE;
use crate::scoring::expression::Expression;
use crate::utils::errors::InvalidConfiguration;

/// How a metric value is rescaled over its candidate pool.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Rescaling {
    Max,
    Min,
    Target,
}

/// Comparison operators usable in filters and requirements.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Operator {
    #[serde(rename = "gt")]
    Gt,
    #[serde(rename = "ge")]
    Ge,
    #[serde(rename = "eq")]
    Eq,
    #[serde(rename = "lt")]
    Lt,
    #[serde(rename = "le")]
    Le,
    #[serde(rename = "ne")]
    Ne,
    #[serde(rename = "in")]
    In,
    #[serde(rename = "not in")]
    NotIn,
}

/// The right-hand side of a comparison: a flag, a number, or a list
/// of numbers for the membership operators.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FilterValue {
    Bool(bool),
    Number(f64),
    List(Vec<f64>),
}

/// A comparison applied to a metric value.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MetricFilter {
    pub operator: Operator,
    pub value: FilterValue,
}

impl MetricFilter {
    /// Applies the comparison to a concrete metric value.
    pub fn matches(&self, value: f64) -> bool {
        match (&self.operator, &self.value) {
            (Operator::Gt, FilterValue::Number(x)) => value > *x,
            (Operator::Ge, FilterValue::Number(x)) => value >= *x,
            (Operator::Eq, FilterValue::Number(x)) => value == *x,
            (Operator::Lt, FilterValue::Number(x)) => value < *x,
            (Operator::Le, FilterValue::Number(x)) => value <= *x,
            (Operator::Ne, FilterValue::Number(x)) => value != *x,
            (Operator::Eq, FilterValue::Bool(x)) => value == f64::from(u8::from(*x)),
            (Operator::Ne, FilterValue::Bool(x)) => value != f64::from(u8::from(*x)),
            (Operator::In, FilterValue::List(xs)) => xs.contains(&value),
            (Operator::NotIn, FilterValue::List(xs)) => !xs.contains(&value),
            _ => false,
        }
    }

    /// Checks that the operator and the value shape fit together.
    fn shape_fault(&self, owner: &str) -> Option<String> {
        match (&self.operator, &self.value) {
            (Operator::In | Operator::NotIn, FilterValue::List(_)) => None,
            (Operator::In | Operator::NotIn, _) => Some(format!(
                "the membership operator of {} requires a list value",
                owner
            )),
            (_, FilterValue::List(_)) => Some(format!(
                "a list value for {} requires the `in` or `not in` operator",
                owner
            )),
            _ => None,
        }
    }
}

fn default_multiplier() -> f64 {
    1.0
}

/// One entry of the `scoring` table.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ScoringParameter {
    pub rescaling: Rescaling,
    #[serde(default)]
    pub value: Option<f64>,
    #[serde(default = "default_multiplier")]
    pub multiplier: f64,
    #[serde(default)]
    pub filter: Option<MetricFilter>,
}

/// The `requirements` section: per-parameter comparisons plus a
/// boolean expression combining them.
///
/// Parameter keys may carry a suffix after a dot
/// (`cdna_length.mono`, `cdna_length.multi`) so the same metric can
/// appear with different thresholds; the metric name is the part
/// before the dot.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Requirements {
    #[serde(default)]
    pub parameters: BTreeMap<String, MetricFilter>,
    #[serde(default)]
    pub expression: Option<String>,
    #[serde(skip)]
    pub compiled: Option<Expression>,
}

/// Strips the optional suffix from a requirements parameter key.
pub fn parameter_metric_name(key: &str) -> &str {
    key.split('.').next().unwrap_or(key)
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DbType {
    Sqlite,
    Mysql,
    Postgresql,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BlastProgram {
    Blastn,
    Blastx,
    Tblastx,
}

fn default_blast_evalue() -> f64 {
    10.0
}

/// External homology settings. Validated here, consumed by the
/// homology collaborator, not by the core pipeline.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct BlastSettings {
    #[serde(default)]
    pub execute: bool,
    #[serde(default)]
    pub program: Option<BlastProgram>,
    #[serde(default)]
    pub database: Option<String>,
    #[serde(default = "default_blast_evalue")]
    pub evalue: f64,
    #[serde(default)]
    pub max_target_seqs: Option<u32>,
}

impl Default for BlastSettings {
    fn default() -> Self {
        Self {
            execute: false,
            program: None,
            database: None,
            evalue: default_blast_evalue(),
            max_target_seqs: None,
        }
    }
}

/// Which externally predicted ORFs a transcript accepts.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct OrfLoading {
    #[serde(default)]
    pub strand_specific: bool,
    #[serde(default)]
    pub minimal_secondary_orf_length: u32,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Leniency {
    Stringent,
    Permissive,
    Lenient,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ChimeraBlastParams {
    #[serde(default)]
    pub evalue: Option<f64>,
    #[serde(default)]
    pub hsp_evalue: Option<f64>,
    #[serde(default)]
    pub max_target_seqs: Option<u32>,
    #[serde(default)]
    pub minimal_hsp_overlap: f64,
    #[serde(default = "default_leniency")]
    pub leniency: Leniency,
}

fn default_leniency() -> Leniency {
    Leniency::Stringent
}

impl Default for ChimeraBlastParams {
    fn default() -> Self {
        Self {
            evalue: None,
            hsp_evalue: None,
            max_target_seqs: None,
            minimal_hsp_overlap: 0.0,
            leniency: default_leniency(),
        }
    }
}

/// Rules for splitting multi-ORF transcripts (validated here,
/// executed by the chimera-splitting collaborator).
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ChimeraSplit {
    #[serde(default)]
    pub execute: bool,
    #[serde(default)]
    pub blast_check: bool,
    #[serde(default)]
    pub blast_params: ChimeraBlastParams,
}

fn default_threads() -> usize {
    1
}

fn default_flank() -> u32 {
    200
}

/// Driver behaviors.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct RunOptions {
    #[serde(default)]
    pub purge: bool,
    #[serde(default)]
    pub exclude_cds: bool,
    #[serde(default)]
    pub remove_overlapping_fragments: bool,
    #[serde(default = "default_threads")]
    pub threads: usize,
    #[serde(default)]
    pub subloci_from_cds_only: bool,
    #[serde(default = "default_flank")]
    pub flank: u32,
}

impl Default for RunOptions {
    fn default() -> Self {
        Self {
            purge: false,
            exclude_cds: false,
            remove_overlapping_fragments: false,
            threads: default_threads(),
            subloci_from_cds_only: false,
            flank: default_flank(),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum LogLevel {
    Info,
    Warn,
    Error,
    Critical,
    Debug,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct LogSettings {
    #[serde(default)]
    pub log: Option<String>,
    #[serde(default = "default_log_level")]
    pub log_level: LogLevel,
}

fn default_log_level() -> LogLevel {
    LogLevel::Warn
}

impl Default for LogSettings {
    fn default() -> Self {
        Self {
            log: None,
            log_level: default_log_level(),
        }
    }
}

fn default_source() -> String {
    "piclo".to_string()
}

fn default_intron_range() -> (u32, u32) {
    DEFAULT_INTRON_RANGE
}

/// The validated configuration object shared, read-only, by every
/// worker.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Configuration {
    #[serde(default)]
    pub db: Option<String>,
    #[serde(default)]
    pub dbtype: Option<DbType>,
    #[serde(default)]
    pub dbhost: Option<String>,
    #[serde(default)]
    pub dbuser: Option<String>,
    #[serde(default)]
    pub dbpasswd: Option<String>,
    #[serde(default)]
    pub dbport: Option<u16>,
    #[serde(default)]
    pub input: Option<String>,
    #[serde(default = "default_source")]
    pub source: String,
    #[serde(default)]
    pub loci_out: Option<String>,
    #[serde(default)]
    pub monoloci_out: Option<String>,
    #[serde(default)]
    pub subloci_out: Option<String>,
    #[serde(default)]
    pub scoring: BTreeMap<String, ScoringParameter>,
    #[serde(default)]
    pub requirements: Option<Requirements>,
    #[serde(default)]
    pub blast: BlastSettings,
    #[serde(default)]
    pub orf_loading: OrfLoading,
    #[serde(default)]
    pub chimera_split: ChimeraSplit,
    #[serde(default)]
    pub run_options: RunOptions,
    #[serde(default)]
    pub log_settings: LogSettings,
    #[serde(default = "default_intron_range")]
    pub intron_range: (u32, u32),
}

impl Default for Configuration {
    fn default() -> Self {
        Self {
            db: None,
            dbtype: None,
            dbhost: None,
            dbuser: None,
            dbpasswd: None,
            dbport: None,
            input: None,
            source: default_source(),
            loci_out: None,
            monoloci_out: None,
            subloci_out: None,
            scoring: BTreeMap::new(),
            requirements: None,
            blast: BlastSettings::default(),
            orf_loading: OrfLoading::default(),
            chimera_split: ChimeraSplit::default(),
            run_options: RunOptions::default(),
            log_settings: LogSettings::default(),
            intron_range: default_intron_range(),
        }
    }
}

impl Configuration {
    /// Loads and validates a configuration from a JSON file.
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Configuration, InvalidConfiguration> {
        let file = File::open(path.as_ref()).map_err(|e| {
            InvalidConfiguration::new(format!(
                "cannot open the configuration file {}: {}",
                path.as_ref().display(),
                e
            ))
        })?;
        let mut config: Configuration = serde_json::from_reader(BufReader::new(file))
            .map_err(|e| InvalidConfiguration::new(format!("malformed configuration: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    /// Validates the whole document, aggregating every fault found.
    /// On success the requirements expression has been compiled.
    pub fn validate(&mut self) -> Result<(), InvalidConfiguration> {
        let mut faults = vec![];

        self.check_scoring(&mut faults);
        self.check_requirements(&mut faults);
        self.check_db(&mut faults);
        self.check_blast(&mut faults);
        self.check_chimera_split(&mut faults);

        if self.run_options.threads == 0 {
            faults.push("run_options.threads must be at least 1".to_string());
        }
        if self.intron_range.0 > self.intron_range.1 {
            faults.push(format!(
                "invalid intron range: [{}, {}]",
                self.intron_range.0, self.intron_range.1
            ));
        }

        if faults.is_empty() {
            Ok(())
        } else {
            Err(InvalidConfiguration::from_faults(faults))
        }
    }

    fn check_scoring(&self, faults: &mut Vec<String>) {
        if self.scoring.is_empty() {
            faults.push("no parameters specified for scoring".to_string());
            return;
        }
        for (name, parameter) in &self.scoring {
            if Metric::from_name(name).is_none() {
                faults.push(format!(
                    "the scoring parameter {} is not an available metric",
                    name
                ));
            }
            if parameter.rescaling == Rescaling::Target && parameter.value.is_none() {
                faults.push(format!(
                    "target rescaling requested for {}, but no target value specified",
                    name
                ));
            }
            if parameter.multiplier == 0.0 {
                faults.push(format!("invalid null multiplier for {}", name));
            }
            if let Some(filter) = &parameter.filter {
                if let Some(fault) = filter.shape_fault(name) {
                    faults.push(fault);
                }
            }
        }
    }

    fn check_requirements(&mut self, faults: &mut Vec<String>) {
        let requirements = match &mut self.requirements {
            Some(requirements) => requirements,
            None => return,
        };
        if requirements.parameters.is_empty() {
            faults.push("the requirements section has no parameters".to_string());
            return;
        }
        for (key, filter) in &requirements.parameters {
            let metric_name = parameter_metric_name(key);
            if Metric::from_name(metric_name).is_none() {
                faults.push(format!(
                    "the requirements parameter {} is not an available metric",
                    key
                ));
            }
            if let Some(fault) = filter.shape_fault(key) {
                faults.push(fault);
            }
        }
        let expression = match &requirements.expression {
            Some(expression) => expression.clone(),
            None => {
                // default: all parameters ANDed together
                let keys: Vec<&str> = requirements.parameters.keys().map(|k| k.as_str()).collect();
                keys.join(" and ")
            }
        };
        match Expression::parse(&expression) {
            Ok(compiled) => {
                let unknown: Vec<&str> = compiled
                    .names()
                    .into_iter()
                    .filter(|name| !requirements.parameters.contains_key(*name))
                    .collect();
                if unknown.is_empty() {
                    requirements.expression = Some(expression);
                    requirements.compiled = Some(compiled);
                } else {
                    faults.push(format!(
                        "expression and required parameters mismatch: {}",
                        unknown.join(", ")
                    ));
                }
            }
            Err(e) => faults.push(format!("invalid requirements expression: {}", e)),
        }
    }

    fn check_db(&mut self, faults: &mut Vec<String>) {
        match self.dbtype {
            Some(DbType::Mysql) | Some(DbType::Postgresql) => {
                if self.dbhost.is_none() {
                    faults.push("no host specified for the database".to_string());
                }
                if self.dbuser.is_none() {
                    faults.push("no user specified for the database".to_string());
                }
                if self.dbpasswd.is_none() {
                    self.dbpasswd = Some(String::new());
                }
                if self.dbport.is_none() {
                    self.dbport = Some(match self.dbtype {
                        Some(DbType::Mysql) => 3306,
                        _ => 5432,
                    });
                }
            }
            _ => {}
        }
        if self.db.is_some() && self.dbtype.is_none() {
            faults.push("a database is specified but its type is not".to_string());
        }
    }

    fn check_blast(&self, faults: &mut Vec<String>) {
        if !self.blast.execute {
            return;
        }
        if self.blast.program.is_none() {
            faults.push("no BLAST program specified".to_string());
        }
        if self.blast.database.is_none() {
            faults.push("no BLAST database provided".to_string());
        }
        if self.blast.evalue < 0.0 {
            faults.push(format!("invalid BLAST evalue: {}", self.blast.evalue));
        }
    }

    fn check_chimera_split(&mut self, faults: &mut Vec<String>) {
        if !(self.chimera_split.execute && self.chimera_split.blast_check) {
            return;
        }
        let params = &mut self.chimera_split.blast_params;
        match (params.evalue, params.hsp_evalue) {
            (None, Some(hsp)) => params.evalue = Some(hsp),
            (Some(evalue), None) => params.hsp_evalue = Some(evalue),
            (Some(evalue), Some(hsp)) if evalue > hsp => {
                faults.push("maximum HSP evalues cannot be higher than global e-values".to_string());
            }
            _ => {}
        }
        if !(0.0..=1.0).contains(&params.minimal_hsp_overlap) {
            faults.push(format!(
                "minimal_hsp_overlap must lie in [0, 1], found {}",
                params.minimal_hsp_overlap
            ));
        }
    }
}
