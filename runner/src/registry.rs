use once_cell::sync::Lazy;
use std::{collections::BTreeMap, fmt, str::FromStr};
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RegistryError {
    #[error("Unknown database vendor '{0}'")]
    UnknownVendor(String),
    #[error("No command registered for {vendor} phase {phase}")]
    UnknownPhase { vendor: Vendor, phase: Phase },
}

/// Database engines with registered command templates
/// (this is deliberately a closed enum, the benchmark ships fixed scripts per vendor)
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub enum Vendor {
    Postgres,
    Oracle,
    Informix,
}

impl FromStr for Vendor {
    type Err = RegistryError;

    fn from_str(name: &str) -> Result<Self, Self::Err> {
        match name.to_lowercase().as_str() {
            "pg" | "postgres" | "postgresql" => Ok(Self::Postgres),
            "oracle" => Ok(Self::Oracle),
            "informix" => Ok(Self::Informix),
            _ => Err(RegistryError::UnknownVendor(name.to_string())),
        }
    }
}

impl fmt::Display for Vendor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Postgres => "PostgreSQL",
            Self::Oracle => "Oracle",
            Self::Informix => "Informix",
        })
    }
}

/// One step of the benchmark lifecycle. Later phases depend on the side
/// effects of earlier ones (indexes need loaded data), so the declared order
/// in `SEQUENCE` is the only valid execution order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub enum Phase {
    InitDb,
    CreateTable,
    LoadData,
    CreateIndex,
    OptimizeTable,
    Query0,
    Query1,
    Query2,
    Query3,
    Query4,
}

impl Phase {
    pub const SEQUENCE: [Phase; 10] = [
        Phase::InitDb,
        Phase::CreateTable,
        Phase::LoadData,
        Phase::CreateIndex,
        Phase::OptimizeTable,
        Phase::Query0,
        Phase::Query1,
        Phase::Query2,
        Phase::Query3,
        Phase::Query4,
    ];

    /// setup phases run before the measured workload and are left out of the
    /// timing report
    pub fn is_setup(self) -> bool {
        matches!(self, Phase::InitDb)
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::InitDb => "InitDB",
            Self::CreateTable => "CreateTable",
            Self::LoadData => "LoadData",
            Self::CreateIndex => "CreateIndex",
            Self::OptimizeTable => "OptimizeTable",
            Self::Query0 => "Query0",
            Self::Query1 => "Query1",
            Self::Query2 => "Query2",
            Self::Query3 => "Query3",
            Self::Query4 => "Query4",
        })
    }
}

/// A phase maps to either one command template or an ordered list of them
/// (LoadData carries one template per data file)
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TemplateSet {
    Single(&'static str),
    List(&'static [&'static str]),
}

impl TemplateSet {
    pub fn templates(&self) -> &[&'static str] {
        match self {
            Self::Single(template) => std::slice::from_ref(template),
            Self::List(templates) => templates,
        }
    }
}

/// Look up the command templates for a (vendor, phase) pair.
pub fn templates_for(vendor: Vendor, phase: Phase) -> Result<&'static TemplateSet, RegistryError> {
    let phases = REGISTRY
        .get(&vendor)
        .ok_or_else(|| RegistryError::UnknownVendor(vendor.to_string()))?;

    phases
        .get(&phase)
        .ok_or(RegistryError::UnknownPhase { vendor, phase })
}

type PhaseMap = BTreeMap<Phase, TemplateSet>;

// Vendors differ wildly in CLI syntax: psql is flag-based, sqlplus runs
// heredoc sessions and sqlldr control files, Informix splits work between
// dbaccess and dbload. Keeping all of that in one table keeps the runner
// vendor-agnostic.
static REGISTRY: Lazy<BTreeMap<Vendor, PhaseMap>> = Lazy::new(|| {
    BTreeMap::from([
        (
            Vendor::Postgres,
            PhaseMap::from([
                (
                    Phase::InitDb,
                    TemplateSet::List(&[
                        r#"psql -c "drop database {dbname}""#,
                        r#"psql -c "drop tablespace {ts_name}""#,
                        r#"psql -c "create tablespace {ts_name} location '{ts_path}'""#,
                        r#"psql -c "create database {dbname} template template0 tablespace {ts_name}""#,
                    ]),
                ),
                (
                    Phase::CreateTable,
                    TemplateSet::Single("psql -d {dbname} -f {script_path}/schema.sql"),
                ),
                (
                    Phase::LoadData,
                    TemplateSet::List(&[
                        r#"psql -d {dbname} -c "COPY dim0 FROM '{script_path}/dim0.dat' USING DELIMITERS ',' ""#,
                        r#"psql -d {dbname} -c "COPY dim1 FROM '{script_path}/dim1.dat' USING DELIMITERS ',' ""#,
                        r#"psql -d {dbname} -c "COPY dim2 FROM '{script_path}/dim2.dat' USING DELIMITERS ',' ""#,
                        r#"psql -d {dbname} -c "COPY fact0 FROM '{script_path}/fact0.dat' USING DELIMITERS ',' ""#,
                    ]),
                ),
                (
                    Phase::CreateIndex,
                    TemplateSet::Single("psql -d {dbname} -f {script_path}/indexes.sql"),
                ),
                (
                    Phase::OptimizeTable,
                    TemplateSet::Single("psql -d {dbname} -f {script_path}/analyze.sql"),
                ),
                (
                    Phase::Query0,
                    TemplateSet::Single("psql -d {dbname} -f {script_path}/qtype0.sql"),
                ),
                (
                    Phase::Query1,
                    TemplateSet::Single("psql -d {dbname} -f {script_path}/qtype1.sql"),
                ),
                (
                    Phase::Query2,
                    TemplateSet::Single("psql -d {dbname} -f {script_path}/qtype2.sql"),
                ),
                (
                    Phase::Query3,
                    TemplateSet::Single("psql -d {dbname} -f {script_path}/qtype3.sql"),
                ),
                (
                    Phase::Query4,
                    TemplateSet::Single("psql -d {dbname} -f {script_path}/qtype4.sql"),
                ),
            ]),
        ),
        (
            Vendor::Oracle,
            PhaseMap::from([
                (
                    Phase::InitDb,
                    // account creation runs as sysdba through a heredoc session
                    TemplateSet::Single(
                        r#"sqlplus "/ as sysdba" << ACCOUNT_EOF
create user {dbname} identified by {dbpassword};
alter user {dbname} default tablespace {ts_name} quota unlimited on {ts_name};
grant connect, resource to {dbname};
ACCOUNT_EOF"#,
                    ),
                ),
                (
                    Phase::CreateTable,
                    TemplateSet::Single("sqlplus {dbuser}/{dbpassword} @{script_path}/schema.sql"),
                ),
                (
                    Phase::LoadData,
                    TemplateSet::List(&[
                        "sqlldr userid={dbuser}/{dbpassword} control={script_path}/dim0.ctl > /dev/null",
                        "sqlldr userid={dbuser}/{dbpassword} control={script_path}/dim1.ctl > /dev/null",
                        "sqlldr userid={dbuser}/{dbpassword} control={script_path}/dim2.ctl > /dev/null",
                        "sqlldr userid={dbuser}/{dbpassword} control={script_path}/fact0.ctl > /dev/null",
                    ]),
                ),
                (
                    Phase::CreateIndex,
                    TemplateSet::Single("sqlplus {dbuser}/{dbpassword} @{script_path}/indexes.sql"),
                ),
                (
                    Phase::OptimizeTable,
                    TemplateSet::Single("sqlplus {dbuser}/{dbpassword} @{script_path}/analyze.sql"),
                ),
                (
                    Phase::Query0,
                    TemplateSet::Single("sqlplus {dbuser}/{dbpassword} @{script_path}/qtype0.sql"),
                ),
                (
                    Phase::Query1,
                    TemplateSet::Single("sqlplus {dbuser}/{dbpassword} @{script_path}/qtype1.sql"),
                ),
                (
                    Phase::Query2,
                    TemplateSet::Single("sqlplus {dbuser}/{dbpassword} @{script_path}/qtype2.sql"),
                ),
                (
                    Phase::Query3,
                    TemplateSet::Single("sqlplus {dbuser}/{dbpassword} @{script_path}/qtype3.sql"),
                ),
                (
                    Phase::Query4,
                    TemplateSet::Single("sqlplus {dbuser}/{dbpassword} @{script_path}/qtype4.sql"),
                ),
            ]),
        ),
        (
            Vendor::Informix,
            PhaseMap::from([
                // DBDATE has to match the generated data files before anything loads
                (Phase::InitDb, TemplateSet::Single("export DBDATE=Y4MD-")),
                (
                    Phase::CreateTable,
                    TemplateSet::Single("dbaccess {dbname} {script_path}/schema.sql"),
                ),
                (
                    Phase::LoadData,
                    TemplateSet::List(&[
                        "dbload -d {dbname} -c {script_path}/dim0.ctl -l dbload.dim0 -e 10 -n 1000 -r",
                        "dbload -d {dbname} -c {script_path}/dim1.ctl -l dbload.dim1 -e 10 -n 1000 -r",
                        "dbload -d {dbname} -c {script_path}/dim2.ctl -l dbload.dim2 -e 10 -n 1000 -r",
                        "dbload -d {dbname} -c {script_path}/fact0.ctl -l dbload.fact0 -e 10 -n 1000 -r",
                    ]),
                ),
                (
                    Phase::CreateIndex,
                    TemplateSet::Single("dbaccess {dbname} {script_path}/indexes.sql"),
                ),
                (
                    Phase::OptimizeTable,
                    TemplateSet::Single("dbaccess {dbname} {script_path}/analyze.sql"),
                ),
                (
                    Phase::Query0,
                    TemplateSet::Single("dbaccess {dbname} {script_path}/qtype0.sql"),
                ),
                (
                    Phase::Query1,
                    TemplateSet::Single("dbaccess {dbname} {script_path}/qtype1.sql"),
                ),
                (
                    Phase::Query2,
                    TemplateSet::Single("dbaccess {dbname} {script_path}/qtype2.sql"),
                ),
                (
                    Phase::Query3,
                    TemplateSet::Single("dbaccess {dbname} {script_path}/qtype3.sql"),
                ),
                (
                    Phase::Query4,
                    TemplateSet::Single("dbaccess {dbname} {script_path}/qtype4.sql"),
                ),
            ]),
        ),
    ])
});
