//! Parsers for external data files

/// Module to parse bait-prey interactions from a SAINT output file
///
/// The file is tab-separated with a header row and must contain the columns
/// `Bait`, `Prey`, `PreyGene`, `AvgSpec` and `BFDR`. The column order does not
/// matter and all other columns are ignored.
pub mod saint {
    use std::fs::File;
    use std::io::{BufRead, BufReader};
    use std::path::Path;

    use tracing::{debug, trace};

    use crate::interactions::{Interaction, InteractionTable};
    use crate::{EnrichError, EnrichResult};

    const BAIT: &str = "Bait";
    const PREY: &str = "Prey";
    const PREY_GENE: &str = "PreyGene";
    const AVG_SPEC: &str = "AvgSpec";
    const BFDR: &str = "BFDR";

    struct Columns {
        bait: usize,
        prey: usize,
        prey_gene: usize,
        avg_spec: usize,
        bfdr: usize,
    }

    impl Columns {
        fn from_header(line: &str) -> EnrichResult<Self> {
            let header: Vec<&str> = line.trim_end_matches(['\r', '\n']).split('\t').collect();
            let find = |name: &'static str| {
                header
                    .iter()
                    .position(|col| *col == name)
                    .ok_or(EnrichError::MissingColumn(name))
            };
            Ok(Self {
                bait: find(BAIT)?,
                prey: find(PREY)?,
                prey_gene: find(PREY_GENE)?,
                avg_spec: find(AVG_SPEC)?,
                bfdr: find(BFDR)?,
            })
        }
    }

    fn column<'a>(cols: &[&'a str], idx: usize, name: &str, line: usize) -> EnrichResult<&'a str> {
        cols.get(idx).copied().ok_or_else(|| EnrichError::ParseError {
            line,
            reason: format!("{name} column is missing"),
        })
    }

    /// Empty cells are `NaN`
    fn number(value: &str, name: &str, line: usize) -> EnrichResult<f64> {
        let value = value.trim();
        if value.is_empty() {
            return Ok(f64::NAN);
        }
        value
            .parse::<f64>()
            .map_err(|err| EnrichError::parse_float(line, name, &err))
    }

    fn parse_line(line: &str, columns: &Columns, line_number: usize) -> EnrichResult<Interaction> {
        let cols: Vec<&str> = line.trim_end_matches(['\r', '\n']).split('\t').collect();

        let avg_spec = number(
            column(&cols, columns.avg_spec, AVG_SPEC, line_number)?,
            AVG_SPEC,
            line_number,
        )?;
        let bfdr = number(
            column(&cols, columns.bfdr, BFDR, line_number)?,
            BFDR,
            line_number,
        )?;

        Ok(Interaction::new(
            column(&cols, columns.bait, BAIT, line_number)?,
            column(&cols, columns.prey, PREY, line_number)?,
            column(&cols, columns.prey_gene, PREY_GENE, line_number)?,
        )
        .with_avg_spec(avg_spec)
        .with_bfdr(bfdr))
    }

    /// Parses all interactions from a reader
    ///
    /// Empty `AvgSpec` or `BFDR` cells are read as `NaN`. Such rows are kept,
    /// but [`InteractionTable::filter`] drops rows without a BFDR and sorts
    /// rows without a spectral count last.
    ///
    /// # Errors
    ///
    /// - [`EnrichError::MissingColumn`] if a required column is not in the header
    /// - [`EnrichError::ParseError`] if a row is too short or contains invalid numbers
    /// - [`EnrichError::Io`] if the reader fails
    ///
    /// # Examples
    ///
    /// ```
    /// use domain_enrichment::parser::saint;
    ///
    /// let data = "Bait\tPrey\tPreyGene\tSpec\tAvgSpec\tBFDR\n\
    ///     AAA\tP11111\tprey1\t\t10\t0.01\n\
    ///     AAA\tP22222\tprey2\t\t20\t0\n";
    ///
    /// let table = saint::parse(data.as_bytes()).unwrap();
    /// assert_eq!(table.len(), 2);
    /// assert_eq!(table.iter().last().unwrap().prey_gene(), "prey2");
    /// ```
    pub fn parse<R: BufRead>(reader: R) -> EnrichResult<InteractionTable> {
        let mut lines = reader.lines();
        let header = match lines.next() {
            Some(line) => line?,
            None => return Ok(InteractionTable::new()),
        };
        let columns = Columns::from_header(&header)?;

        let mut table = InteractionTable::new();
        for (idx, line) in lines.enumerate() {
            let line = line?;
            // header is line 1
            let line_number = idx + 2;
            if line.trim().is_empty() {
                trace!("Skipping empty line {}", line_number);
                continue;
            }
            table.push(parse_line(&line, &columns, line_number)?);
        }
        debug!("Parsed {} interactions", table.len());
        Ok(table)
    }

    /// Parses all interactions from a SAINT file
    ///
    /// # Errors
    ///
    /// See [`parse`]
    pub fn from_file<P: AsRef<Path>>(path: P) -> EnrichResult<InteractionTable> {
        let file = File::open(path)?;
        parse(BufReader::new(file))
    }

}
