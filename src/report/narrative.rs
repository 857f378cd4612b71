//! Static prose shown next to the charts. `**bold**` spans are rendered strong.

pub const TITLE: &str = "Adults Analysis";

pub const INTRO: &str = "This dataset is about adults aged 18 and over, selected as a random sample. \
It includes personal information such as **age**, **education**, **job**, and **hours worked per week**. \
The main goal of the dataset is to **predict whether a person earns more or less than $50K per year** \
based on these features.";

pub const CLEANED_NOTE: &str = "Note: This dataset is shown **after cleaning**.";

/// (column, description) rows of the column reference table.
pub const COLUMN_DESCRIPTIONS: [(&str, &str); 15] = [
    ("age", "Age of the individual"),
    ("workclass", "Type of employment"),
    ("fnlwgt", "Final weight (used to represent the population)"),
    ("education", "Level of education"),
    ("education-num", "Numerical representation of education level"),
    ("marital-status", "Marital status of the individual"),
    ("occupation", "Type of job"),
    ("relationship", "Relationship status within household"),
    ("race", "Race of the individual"),
    ("sex", "Gender of the individual"),
    ("capital-gain", "Income from investment sources (capital gains)"),
    ("capital-loss", "Capital losses (e.g., from investments)"),
    ("hours-per-week", "Average hours worked per week"),
    ("native-country", "Country"),
    ("income", "Income group (<=50K or >50K)"),
];

pub const EDUCATION: &str = "The chart shows that most people with lower education levels like **High School** \
and **Some college** have low income. People with higher education like **Bachelors** and **Masters** are more \
likely to have high income.";

pub const GENDER: &str =
    "The chart shows that **males** represent the majority of high-income earners compared to **females**.";

pub const OCCUPATIONS: &str = "The chart shows that the highest-paying occupations are **professional specialties** \
and **executive-managerial roles**, followed by **sales** and **craft-related jobs**.";

pub const HOURS: &str =
    "The chart shows that there is a **weak positive correlation** between hours worked per week and income level.";

pub const COUNTRIES: &str = "The chart ranks **the top 10 high-income countries**, where the colour gradient \
reflects the number of high-income individuals. **The United States** stands out as one of the leading countries.";

pub const MARITAL: &str = "The chart shows that **never-married** and **married-civ-spouse** individuals represent \
the highest counts of **low-income** earners, while **married-civ-spouse** individuals also have a significant \
number of high-income earners.";

pub const EDUCATION_NUM: &str = "The chart shows the average education level by income. **More than half** of the \
individuals with higher education fall into the **high-income group**, while the **rest** have **low income**.";

pub const WORKCLASS_HOURS: &str = "The chart shows that **self-employed** individuals with **incorporated businesses** \
work the most hours per week. On the other hand, those who have **never worked** have the lowest average weekly \
work hours.";

pub const RACE: &str = "The chart shows that the number of income-classified individuals from the **White race** is \
significantly higher than all other racial groups. Other races like **Black**, **Asian-Pac-Islander**, \
**Amer-Indian-Eskimo**, and **Others** have much lower counts.";

pub const WORKCLASS: &str = "The chart shows the number of people in different workclass categories classified by \
income levels **(Low and High)**. The majority of people in the **Private** workclass have **low income**, with a \
notable number also in the high-income category. Other categories like **Self-emp-not-inc**, **Local-gov**, \
**State-gov**, **Federal-gov**, **Self-emp-inc**, **Without-pay** and **Never-worked** have fewer people with \
varying low and high income distributions.";

pub const FEMALE_OCCUPATIONS: &str = "The chart shows the distribution of the most common occupations. The largest \
areas are **Adm-clerical** and **Prof-specialty** followed by **Other-service**, **Sales**, and **Exec-managerial** \
indicating their relative prevalence. The **size** of each rectangle represents the proportion of females in each \
occupation.";

pub const SUMMARY_INTRO: &str = "The dashboard analyzes the adult dataset to predict income levels **(>50K or <=50K)** \
based on features like **age**, **education**, **occupation**, and **hours worked per week**. It includes \
interactive filters (**gender**, **race**, **country**) and visualizations across four tabs: **Overview**, \
**Visualization with Outliers**, **Visualization without Outliers**, and **Summary & Recommendations**. \
Key insights include:";

/// (heading, text) pairs of the key insights list.
pub const INSIGHTS: [(&str, &str); 10] = [
    ("Education and Income", "Higher education levels (**Bachelors**, **Masters**) correlate with higher income, while lower education levels (**High School**) are associated with lower income."),
    ("Gender Disparity", "Males dominate high-income groups compared to females."),
    ("Occupations", "**Professional specialties** and **executive-managerial roles** are the most common among high-income earners."),
    ("Work Hours", "A weak positive correlation exists between weekly work hours and income."),
    ("Country Distribution", "**The United States** has the highest number of high-income individuals."),
    ("Marital Status", "**Married** individuals (civil spouse) have a significant presence in both high- and low-income groups."),
    ("Race", "**White** individuals dominate high-income groups with other races having lower representation."),
    ("Workclass", "**Self-employed** individuals with incorporated businesses work the most hours, while **private sector** workers dominate both income categories."),
    ("Female Occupations", "**Administrative**, **clerical**, and **professional specialties** are the most common occupations among **females**."),
    ("Outliers", "The difference between data **with outliers** and **without outliers** indicates that outliers have little significant impact on the overall trends and distributions."),
];

/// (heading, text) pairs of the recommendations list.
pub const RECOMMENDATIONS: [(&str, &str); 6] = [
    ("Focus on Education", "Promote higher education programs, as advanced degrees strongly correlate with higher income."),
    ("Address Gender Inequality", "Develop policies to reduce income disparities, particularly supporting women in high-paying roles."),
    ("Target High-Income Occupations", "Encourage training in professional specialties and managerial roles to boost income potential."),
    ("Work-Life Balance", "Investigate the weak correlation between work hours and income to optimize productivity without excessive hours."),
    ("Diversity in Employment", "Increase representation of underrepresented races in high-income roles through targeted career development programs."),
    ("Support for Self-Employed", "Provide resources for self-employed individuals especially those in incorporated businesses to sustain high work hours and income."),
];

/// Split `text` into `(segment, bold)` runs on `**` markers.
pub fn bold_runs(text: &str) -> Vec<(&str, bool)> {
    text.split("**")
        .enumerate()
        .filter(|(_, s)| !s.is_empty())
        .map(|(i, s)| (s, i % 2 == 1))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bold_runs_alternate() {
        assert_eq!(
            bold_runs("plain **bold** tail"),
            vec![("plain ", false), ("bold", true), (" tail", false)]
        );
        assert_eq!(bold_runs("**all**"), vec![("all", true)]);
        assert!(bold_runs("").is_empty());
    }
}
