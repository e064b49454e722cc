use serde::{Deserialize, Serialize};

/// A row of the employee directory, from the `employees` table or the CSV fallback.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Employee {
    #[serde(default, skip_serializing)]
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub department: String,
    #[serde(
        default,
        alias = "phone_number",
        alias = "mobile",
        alias = "mobile_number",
        alias = "contact"
    )]
    pub phone: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub position: String,
    #[serde(default, alias = "joining_date")]
    pub join_date: String,
    /// Stored for HR purposes only; never read out by the receptionist.
    #[serde(default, skip_serializing)]
    pub salary: String,
}

impl Employee {
    pub fn new(name: &str, department: &str, phone: &str, email: &str) -> Self {
        Self {
            id: 0,
            name: name.trim().to_string(),
            department: department.trim().to_string(),
            phone: phone.trim().to_string(),
            email: email.trim().to_string(),
            position: String::new(),
            join_date: String::new(),
            salary: String::new(),
        }
    }

    pub fn first_name(&self) -> &str {
        self.name.split_whitespace().next().unwrap_or("")
    }

    /// Value of a shareable field by its canonical name.
    /// Salary is deliberately not addressable.
    pub fn field(&self, field: EmployeeField) -> &str {
        match field {
            EmployeeField::Email => &self.email,
            EmployeeField::Phone => &self.phone,
            EmployeeField::Department => &self.department,
            EmployeeField::Position => &self.position,
            EmployeeField::JoinDate => &self.join_date,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EmployeeField {
    Email,
    Phone,
    Department,
    Position,
    JoinDate,
}

impl EmployeeField {
    pub fn label(&self) -> &'static str {
        match self {
            EmployeeField::Email => "email",
            EmployeeField::Phone => "phone number",
            EmployeeField::Department => "department",
            EmployeeField::Position => "position",
            EmployeeField::JoinDate => "joining date",
        }
    }

    /// Canonical field name, as returned by the extraction model.
    pub fn from_key(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().replace(' ', "_").as_str() {
            "email" | "mail" | "gmail" | "e-mail" | "email_id" => Some(Self::Email),
            "phone" | "mobile" | "phone_number" | "number" | "contact" => Some(Self::Phone),
            "department" | "dept" => Some(Self::Department),
            "position" | "role" | "designation" | "title" | "job_title" => Some(Self::Position),
            "join_date" | "joining_date" | "date_of_joining" | "hire_date" | "start_date" => {
                Some(Self::JoinDate)
            }
            _ => None,
        }
    }
}
