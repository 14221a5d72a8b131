//! Implements the very simple `Fetch` trait using in-memory data for testing purposes.
//!
//! Note: this is compiled even in the "production" version of this app so that we can run the whole
//! app, top-to-bottom, without a server.

use crate::api::Fetch;
use crate::error::LoadError;
use std::collections::HashMap;

/// An implementation of the `Fetch` trait that holds files in memory. By default, it is seeded
/// with a small sample of every file in the default folder catalog.
#[derive(Debug, Clone)]
pub struct TestFetch {
    files: HashMap<(String, String), Vec<u8>>,
}

impl TestFetch {
    /// Creates a `TestFetch` that holds no files at all.
    pub fn empty() -> Self {
        Self {
            files: HashMap::new(),
        }
    }

    /// Adds or replaces the contents of `folder/filename`.
    pub fn insert(
        &mut self,
        folder: impl Into<String>,
        filename: impl Into<String>,
        contents: impl Into<Vec<u8>>,
    ) {
        self.files
            .insert((folder.into(), filename.into()), contents.into());
    }

    /// Builder form of `insert`.
    pub fn with(
        mut self,
        folder: impl Into<String>,
        filename: impl Into<String>,
        contents: impl Into<Vec<u8>>,
    ) -> Self {
        self.insert(folder, filename, contents);
        self
    }
}

#[async_trait::async_trait]
impl Fetch for TestFetch {
    async fn fetch(&self, folder: &str, filename: &str) -> Result<Vec<u8>, LoadError> {
        self.files
            .get(&(folder.to_string(), filename.to_string()))
            .cloned()
            .ok_or_else(|| LoadError::fetch(filename, "404 Not Found"))
    }
}

impl Default for TestFetch {
    /// Loads seed data from this module.
    fn default() -> Self {
        Self::empty()
            .with("sales", "people-1000.csv", PEOPLE_DATA)
            .with("sales", "employees.csv", EMPLOYEE_DATA)
            .with("finance", "organizations-1000.csv", ORGANIZATION_DATA)
            .with("finance", "customers-1000.csv", CUSTOMER_DATA)
    }
}

/// Seed people data.
const PEOPLE_DATA: &str = r##"Index,User Id,First Name,Last Name,Sex,Email,Phone,Date of birth,Job Title
1,88F7B33d2bcf9f5,Shelby,Terrell,Male,elijah57@example.net,001-084-906-7849x73518,1945-10-26,Games developer
2,f90cD3E76f1A9b9,Phillip,Summers,Female,bethany14@example.com,214.112.6044x4913,1910-03-24,Phytotherapist
3,DbeAb8CcdfeFC2c,Kristine,Travis,Male,bthompson@example.com,277.609.7938,1992-07-02,Homeopath

4,A31Bee3c201ef58,Yesenia,Martinez,Male,kaitlinkaiser@example.com,584.094.6111,2017-08-03,Market researcher
5,1bA7A3dc874da3c,Lori,Todd,Male,buchananmanuel@example.net,689-207-3558x7233,1938-12-01,Veterinary surgeon
"##;

/// Seed employee data. It carries its own date column.
const EMPLOYEE_DATA: &str = r##"Employee,Department,date,Salary
Ann Lee,Sales,2024-02-01,"$72,000"
Raj Patel,Sales,,"$65,500"
Mia Chen,Support,2024-03-15,"$58,250"
"##;

/// Seed organization data.
const ORGANIZATION_DATA: &str = r##"Index,Organization Id,Name,Website,Country,Description,Founded,Industry,Number of employees
1,FAB0d41d5b5d22c,Ferrell LLC,https://price.net/,Papua New Guinea,Horizontal empowering knowledgebase,1990,Plastics,3498
2,6A7EdDEA9FaDC52,"Mckinney, Riley and Day",http://www.hall-buchanan.info/,Finland,User-centric system-worthy leverage,2015,Glass / Ceramics / Concrete,4952
3,0bFED1ADAE4bcC1,Hester Ltd,http://sullivan-reed.com/,China,Switchable scalable moratorium,1971,Public Safety,5287
"##;

/// Seed customer data.
const CUSTOMER_DATA: &str = r##"Index,Customer Id,First Name,Last Name,Company,City,Country,Phone 1,Email,Subscription Date,Website
1,DD37Cf93aecA6Dc,Sheryl,Baxter,Rasmussen Group,East Leonard,Chile,229.077.5154,zunigavanessa@smith.info,2020-08-24,http://www.stephenson.com/
2,1Ef7b82A4CAAD10,Preston,Lozano,Vega-Gentry,East Jimmychester,Djibouti,5153435776,vmata@colon.com,2021-04-23,http://www.hobbs.com/
"##;
