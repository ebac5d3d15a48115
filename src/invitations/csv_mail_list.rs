use tracing::{debug, warn};

/// Name of the column mail addresses are read from.
const EMAIL_COLUMN: &str = "email";

/// Parser of the CSV files with mail addresses to send invitations to. The file must have a header
/// row with an `email` column, other columns are ignored.
pub struct CsvMailList;
impl CsvMailList {
    /// Checks if the uploaded file name looks like a CSV file.
    pub fn supports(file_name: &str) -> bool {
        file_name
            .rsplit_once('.')
            .is_some_and(|(_, extension)| extension.eq_ignore_ascii_case("csv"))
    }

    /// Parses the CSV file content and returns non-empty values of the `email` column. Errors are
    /// returned as messages that can be shown to the user.
    pub fn parse(content: &[u8]) -> Result<Vec<String>, &'static str> {
        let mut reader = csv::ReaderBuilder::new()
            .flexible(true)
            .trim(csv::Trim::All)
            .from_reader(content);

        let email_column = reader
            .headers()
            .ok()
            .and_then(|headers| headers.iter().position(|header| header == EMAIL_COLUMN))
            .ok_or("Error processing CSV file. No 'email' column was found.")?;

        let mut mail_addresses = vec![];
        for (index, record) in reader.records().enumerate() {
            let record = match record {
                Ok(record) => record,
                Err(err) => {
                    warn!("Failed to parse CSV record with index {index}: {err:?}");
                    continue;
                }
            };

            if let Some(mail_address) = record.get(email_column).filter(|cell| !cell.is_empty()) {
                mail_addresses.push(mail_address.to_string());
            }
        }

        debug!(
            "Parsed CSV file with {} mail addresses.",
            mail_addresses.len()
        );

        if mail_addresses.is_empty() {
            return Err("No mail addresses were found in the file.");
        }

        Ok(mail_addresses)
    }
}
