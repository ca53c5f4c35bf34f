use super::value_selection::ValueSelector;
use super::variable_selection::VariableSelector;
use super::Brancher;
use super::Decision;
use super::SelectionContext;

/// An implementation of a [`Brancher`] which simply uses a single [`VariableSelector`] and a
/// single [`ValueSelector`] independently of one another.
#[derive(Debug)]
pub struct IndependentVariableValueBrancher<VariableSelect, ValueSelect> {
    /// The strategy used to select a variable
    pub(crate) variable_selector: VariableSelect,
    /// The strategy used to select a value for the selected variable
    pub(crate) value_selector: ValueSelect,
}

impl<VariableSelect, ValueSelect> IndependentVariableValueBrancher<VariableSelect, ValueSelect>
where
    VariableSelect: VariableSelector,
    ValueSelect: ValueSelector,
{
    pub fn new(variable_selector: VariableSelect, value_selector: ValueSelect) -> Self {
        IndependentVariableValueBrancher {
            variable_selector,
            value_selector,
        }
    }
}

impl<VariableSelect, ValueSelect> Brancher
    for IndependentVariableValueBrancher<VariableSelect, ValueSelect>
where
    VariableSelect: VariableSelector,
    ValueSelect: ValueSelector,
{
    /// First we select a variable. If all variables under consideration are fixed we return
    /// [`None`], otherwise the value selector picks the value of the left branch.
    fn next_decision(&mut self, context: &mut SelectionContext) -> Option<Decision> {
        let variable = self.variable_selector.select_variable(context)?;
        let value = self.value_selector.select_value(context, variable);
        Some(Decision { variable, value })
    }
}
